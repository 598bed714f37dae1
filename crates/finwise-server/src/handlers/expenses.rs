//! Expense tracker handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::{Expense, ExpenseCategory};

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

/// Reset requests must carry explicit confirmation
#[derive(Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

pub(crate) fn require_confirmation(request: &ResetRequest) -> Result<(), AppError> {
    if !request.confirm {
        return Err(AppError::bad_request(
            "Reset requires explicit confirmation (confirm: true)",
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub by_category: BTreeMap<String, f64>,
}

#[derive(Serialize)]
pub struct ExpenseSummaryResponse {
    pub total: f64,
    pub by_category: BTreeMap<String, f64>,
}

fn category_totals_by_name(totals: BTreeMap<ExpenseCategory, f64>) -> BTreeMap<String, f64> {
    totals
        .into_iter()
        .map(|(category, amount)| (category.as_str().to_string(), amount))
        .collect()
}

/// List expenses with derived totals
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<ExpenseListResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(ExpenseListResponse {
        expenses: trackers.expenses.expenses().to_vec(),
        total: trackers.expenses.total(),
        by_category: category_totals_by_name(trackers.expenses.category_totals()),
    })
}

/// Record a new expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<Json<Expense>, AppError> {
    let category: ExpenseCategory = request
        .category
        .parse()
        .map_err(|e: String| AppError::unprocessable(&e))?;

    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    let expense = trackers
        .expenses
        .add(request.amount, category, &request.description)
        .cloned()
        .ok_or_else(|| AppError::unprocessable("Expense amount must be a positive number"))?;

    Ok(Json(expense))
}

/// Clear all expenses (requires confirmation)
pub async fn reset_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require_confirmation(&request)?;
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    workspace.trackers.lock().unwrap().expenses.reset();
    Ok(Json(SuccessResponse { success: true }))
}

/// Derived totals only
pub async fn expense_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<ExpenseSummaryResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(ExpenseSummaryResponse {
        total: trackers.expenses.total(),
        by_category: category_totals_by_name(trackers.expenses.category_totals()),
    })
}

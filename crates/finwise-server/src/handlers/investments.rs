//! Investment overview handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::{Investment, InvestmentKind};

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

use super::expenses::{require_confirmation, ResetRequest};

#[derive(Deserialize)]
pub struct CreateInvestmentRequest {
    #[serde(alias = "type")]
    pub kind: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct InvestmentListResponse {
    pub investments: Vec<Investment>,
    pub total: f64,
    pub by_kind: BTreeMap<String, f64>,
}

#[derive(Serialize)]
pub struct InvestmentSummaryResponse {
    pub total: f64,
    pub by_kind: BTreeMap<String, f64>,
}

fn kind_totals_by_name(totals: BTreeMap<InvestmentKind, f64>) -> BTreeMap<String, f64> {
    totals
        .into_iter()
        .map(|(kind, amount)| (kind.as_str().to_string(), amount))
        .collect()
}

/// List investments with portfolio totals
pub async fn list_investments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<InvestmentListResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(InvestmentListResponse {
        investments: trackers.investments.investments().to_vec(),
        total: trackers.investments.total(),
        by_kind: kind_totals_by_name(trackers.investments.kind_totals()),
    })
}

/// Record an investment
pub async fn create_investment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<CreateInvestmentRequest>,
) -> Result<Json<Investment>, AppError> {
    let kind: InvestmentKind = request
        .kind
        .parse()
        .map_err(|e: String| AppError::unprocessable(&e))?;

    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    let investment = trackers
        .investments
        .add(kind, request.amount)
        .cloned()
        .ok_or_else(|| AppError::unprocessable("Investment amount must be a positive number"))?;

    Ok(Json(investment))
}

/// Remove all investments (requires confirmation)
pub async fn reset_investments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require_confirmation(&request)?;
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    workspace.trackers.lock().unwrap().investments.reset();
    Ok(Json(SuccessResponse { success: true }))
}

/// Derived totals only
pub async fn investment_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<InvestmentSummaryResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(InvestmentSummaryResponse {
        total: trackers.investments.total(),
        by_kind: kind_totals_by_name(trackers.investments.kind_totals()),
    })
}

//! Emergency fund handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::EmergencyFund;

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

use super::expenses::{require_confirmation, ResetRequest};

#[derive(Serialize)]
pub struct EmergencyFundView {
    #[serde(flatten)]
    pub fund: EmergencyFund,
    pub progress_percent: f64,
    pub months_to_goal: i64,
}

impl From<&EmergencyFund> for EmergencyFundView {
    fn from(fund: &EmergencyFund) -> Self {
        Self {
            fund: fund.clone(),
            progress_percent: fund.progress_percent(),
            months_to_goal: fund.months_to_goal(),
        }
    }
}

#[derive(Deserialize)]
pub struct SetTargetRequest {
    pub target_amount: f64,
}

/// The fund with its derived metrics
pub async fn get_emergency_fund(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<EmergencyFundView> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(EmergencyFundView::from(&trackers.emergency))
}

/// Apply one monthly contribution
pub async fn contribute_to_emergency_fund(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<EmergencyFundView> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    trackers.emergency.add_contribution();
    Json(EmergencyFundView::from(&trackers.emergency))
}

/// Manually adjust the target amount
pub async fn set_emergency_fund_target(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<SetTargetRequest>,
) -> Result<Json<EmergencyFundView>, AppError> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    if !trackers.emergency.set_target(request.target_amount) {
        return Err(AppError::unprocessable(
            "Target amount must be a positive number",
        ));
    }
    Ok(Json(EmergencyFundView::from(&trackers.emergency)))
}

/// Drop the balance to zero (requires confirmation)
pub async fn reset_emergency_fund(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require_confirmation(&request)?;
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    workspace.trackers.lock().unwrap().emergency.reset();
    Ok(Json(SuccessResponse { success: true }))
}

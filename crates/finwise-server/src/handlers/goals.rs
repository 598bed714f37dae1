//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use finwise_core::{Frequency, SavingsGoal};

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

use super::expenses::{require_confirmation, ResetRequest};

#[derive(Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub contribution_amount: f64,
    pub frequency: String,
}

#[derive(Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub progress_percent: f64,
}

impl From<&SavingsGoal> for GoalView {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            goal: goal.clone(),
            progress_percent: goal.progress_percent(),
        }
    }
}

#[derive(Serialize)]
pub struct GoalListResponse {
    pub goals: Vec<GoalView>,
    pub total_saved: f64,
}

/// List goals with display-clamped progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<GoalListResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let trackers = workspace.trackers.lock().unwrap();
    Json(GoalListResponse {
        goals: trackers.goals.goals().iter().map(GoalView::from).collect(),
        total_saved: trackers.goals.total_saved(),
    })
}

/// Create a goal starting at zero progress
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<Json<GoalView>, AppError> {
    let frequency: Frequency = request
        .frequency
        .parse()
        .map_err(|e: String| AppError::unprocessable(&e))?;

    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    let goal = trackers
        .goals
        .add(
            &request.name,
            request.target_amount,
            request.contribution_amount,
            frequency,
        )
        .map(GoalView::from)
        .ok_or_else(|| {
            AppError::unprocessable(
                "Goal requires a name and positive target and contribution amounts",
            )
        })?;

    Ok(Json(goal))
}

/// Apply one fixed contribution to a goal
pub async fn contribute_to_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalView>, AppError> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let mut trackers = workspace.trackers.lock().unwrap();
    let goal = trackers
        .goals
        .contribute(goal_id)
        .map(GoalView::from)
        .ok_or_else(|| AppError::not_found("Goal not found"))?;

    Ok(Json(goal))
}

/// Remove all goals (requires confirmation)
pub async fn reset_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require_confirmation(&request)?;
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    workspace.trackers.lock().unwrap().goals.reset();
    Ok(Json(SuccessResponse { success: true }))
}

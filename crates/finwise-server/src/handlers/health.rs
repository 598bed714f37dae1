//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use finwise_core::{BankClient, LlmBackend};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub llm: Option<LlmStatus>,
    pub bank: &'static str,
}

#[derive(Serialize)]
pub struct LlmStatus {
    pub host: String,
    pub model: String,
    pub healthy: bool,
}

/// Service status plus collaborator reachability
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let llm = match state.llm {
        Some(ref client) => Some(LlmStatus {
            host: client.host().to_string(),
            model: client.model().to_string(),
            healthy: client.health_check().await,
        }),
        None => None,
    };

    let bank = match state.bank {
        BankClient::OpenBank(_) => "openbank",
        BankClient::Mock(_) => "mock",
    };

    Json(HealthResponse {
        status: "ok",
        llm,
        bank,
    })
}

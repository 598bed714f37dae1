//! Learning content handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use finwise_core::LearningContent;

use crate::{AppError, AppState, AuthedUser};

/// Fetch quiz, quotes, and blog links.
///
/// Each set degrades independently to its fallback; the response's `source`
/// tags say which sets were generated.
pub async fn get_learning_content(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthedUser>,
) -> Result<Json<LearningContent>, AppError> {
    let loader = state
        .loader()
        .ok_or_else(|| AppError::service_unavailable("LLM backend not configured"))?;

    Ok(Json(loader.load().await))
}

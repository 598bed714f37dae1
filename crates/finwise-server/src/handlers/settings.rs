//! Settings handlers: currency and dark mode

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::{currency, Error, UserProfile};

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

#[derive(Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

/// The fixed currency catalog
pub async fn list_currencies() -> Json<Vec<CurrencyInfo>> {
    Json(
        currency::CURRENCIES
            .iter()
            .map(|c| CurrencyInfo {
                code: c.code,
                symbol: c.symbol,
                name: c.name,
            })
            .collect(),
    )
}

#[derive(Deserialize)]
pub struct UpdateCurrencyRequest {
    pub currency: String,
}

/// Change the profile currency; the remote write is awaited
pub async fn update_currency(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<UpdateCurrencyRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .auth
        .update_currency(&user.uid, &request.currency)
        .await
        .map_err(|e| match e {
            Error::InvalidData(msg) => AppError::unprocessable(&msg),
            Error::NotFound(msg) => AppError::not_found(&msg),
            other => other.into(),
        })?;

    Ok(Json(profile))
}

#[derive(Serialize)]
pub struct DarkModeResponse {
    pub dark_mode: bool,
}

#[derive(Deserialize)]
pub struct SetDarkModeRequest {
    pub enabled: bool,
}

pub async fn get_dark_mode(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthedUser>,
) -> Json<DarkModeResponse> {
    Json(DarkModeResponse {
        dark_mode: state.auth.dark_mode(),
    })
}

pub async fn set_dark_mode(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthedUser>,
    Json(request): Json<SetDarkModeRequest>,
) -> Json<SuccessResponse> {
    state.auth.set_dark_mode(request.enabled);
    Json(SuccessResponse { success: true })
}

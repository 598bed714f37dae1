//! Authentication and session handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::{AuthError, Error, UserProfile};

use crate::{AppError, AppState, AuthedUser, SuccessResponse};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub currency: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub profile: UserProfile,
}

/// Map gateway errors onto HTTP statuses with their user-facing messages
fn map_auth_error(err: Error) -> AppError {
    match err {
        Error::Auth(auth_err) => {
            let message = auth_err.to_string();
            match auth_err {
                AuthError::EmailInUse => AppError::conflict(&message),
                AuthError::WeakPassword
                | AuthError::InvalidEmail
                | AuthError::MissingFields => AppError::bad_request(&message),
                AuthError::InvalidCredentials => AppError::unauthorized(&message),
                AuthError::Network | AuthError::Provider(_) => {
                    AppError::service_unavailable(&message)
                }
            }
        }
        other => other.into(),
    }
}

/// Create an account; the profile document is durable before this returns
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .auth
        .sign_up(
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
            request.currency.as_deref(),
        )
        .await
        .map_err(map_auth_error)?;

    let token = session.user.id_token.clone();
    state.issue_token(&token, &session.user.uid).await;

    Ok(Json(SessionResponse {
        token,
        profile: session.profile,
    }))
}

/// Sign in and issue a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .auth
        .sign_in(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    let token = session.user.id_token.clone();
    state.issue_token(&token, &session.user.uid).await;

    Ok(Json(SessionResponse {
        token,
        profile: session.profile,
    }))
}

/// Invalidate the session: token, workspace, cache, local store
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<SuccessResponse> {
    if !user.token.is_empty() {
        state.revoke_token(&user.token).await;
    }
    state.workspaces.remove(&user.uid).await;
    state.auth.sign_out();

    Json(SuccessResponse { success: true })
}

#[derive(Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub profile: Option<UserProfile>,
    pub dark_mode: bool,
}

/// The authenticated user's profile, as currently cached
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<MeResponse> {
    let profile = state.auth.cached_profile(&user.uid);
    Json(MeResponse {
        uid: user.uid,
        profile,
        dark_mode: state.auth.dark_mode(),
    })
}

//! AI advisor chat handlers
//!
//! One request in flight per user: the chat log's state machine rejects a
//! submission while a response is pending, and the handler surfaces that as
//! 409. The advisor call happens outside the log lock.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use finwise_core::ChatMessage;

use crate::{AppError, AppState, AuthedUser};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: ChatMessage,
}

#[derive(Serialize)]
pub struct ChatLogResponse {
    pub messages: Vec<ChatMessage>,
    pub awaiting_response: bool,
}

/// The session's message log
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
) -> Json<ChatLogResponse> {
    let workspace = state.workspaces.get_or_create(&user.uid).await;
    let chat = workspace.chat.lock().unwrap();
    Json(ChatLogResponse {
        messages: chat.messages().to_vec(),
        awaiting_response: chat.is_awaiting(),
    })
}

/// Submit a message and wait for the advisor's reply
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let advisor = state
        .advisor()
        .ok_or_else(|| AppError::service_unavailable("AI advisor not configured"))?;

    let workspace = state.workspaces.get_or_create(&user.uid).await;

    // Submit under the lock; generation happens outside it.
    let query = {
        let mut chat = workspace.chat.lock().unwrap();
        if chat.is_awaiting() {
            return Err(AppError::conflict("A response is already in progress"));
        }
        match chat.submit(&request.message) {
            Some(message) => message.text.clone(),
            None => return Err(AppError::bad_request("Message is empty")),
        }
    };

    // Failures become the apology message inside complete(), never an error.
    let result = advisor.generate(&query).await;

    let reply = {
        let mut chat = workspace.chat.lock().unwrap();
        chat.complete(result).cloned()
    };

    match reply {
        Some(reply) => Ok(Json(ChatResponse { reply })),
        // complete() only returns None if the pending submission vanished
        None => Err(AppError::conflict("Chat session state changed during generation")),
    }
}

//! Test utilities for finwise-core
//!
//! Provides a mock LLM HTTP server speaking both the Gemini
//! `generateContent` and OpenAI chat-completions wire formats, so the real
//! HTTP backends can be exercised without provider credentials.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::llm::canned_response;

struct MockLlmState {
    /// Requests that still answer 429 before the server behaves
    rate_limits_remaining: AtomicU32,
    /// Total requests observed
    requests: AtomicU32,
}

/// Mock LLM server for testing the HTTP backends
pub struct MockLlmServer {
    addr: SocketAddr,
    state: Arc<MockLlmState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with_rate_limits(0).await
    }

    /// Start a server whose first `n` requests answer 429
    pub async fn start_with_rate_limits(n: u32) -> Self {
        let state = Arc::new(MockLlmState {
            rate_limits_remaining: AtomicU32::new(n),
            requests: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v1beta/models/:model_action", post(handle_gemini))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Total requests the server has seen
    pub fn request_count(&self) -> u32 {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn take_rate_limit(state: &MockLlmState) -> bool {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let remaining = state.rate_limits_remaining.load(Ordering::SeqCst);
    if remaining > 0 {
        state.rate_limits_remaining.store(remaining - 1, Ordering::SeqCst);
        true
    } else {
        false
    }
}

/// Gemini generateContent endpoint
async fn handle_gemini(
    State(state): State<Arc<MockLlmState>>,
    Json(request): Json<Value>,
) -> Response {
    if take_rate_limit(&state) {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();

    Json(json!({
        "candidates": [
            {"content": {"parts": [{"text": canned_response(prompt)}], "role": "model"}}
        ]
    }))
    .into_response()
}

/// OpenAI chat completions endpoint
async fn handle_chat_completions(
    State(state): State<Arc<MockLlmState>>,
    Json(request): Json<Value>,
) -> Response {
    if take_rate_limit(&state) {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    let prompt = request["messages"][0]["content"].as_str().unwrap_or_default();

    Json(json!({
        "choices": [
            {"message": {"role": "assistant", "content": canned_response(prompt)}}
        ]
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::llm::{GeminiBackend, LlmBackend, OpenAiCompatBackend, MOCK_ADVICE};

    #[tokio::test]
    async fn test_gemini_backend_over_http() {
        let server = MockLlmServer::start().await;
        let backend = GeminiBackend::with_host(&server.url(), "test-key", "gemini-2.0-flash");

        let advice = backend.generate("What about my savings?").await.unwrap();
        assert_eq!(advice, MOCK_ADVICE);

        let quiz = backend.generate("Generate 10 quiz questions.").await.unwrap();
        assert!(quiz.starts_with('['));
        assert_eq!(server.request_count(), 2);
    }

    #[tokio::test]
    async fn test_gemini_backend_maps_429() {
        let server = MockLlmServer::start_with_rate_limits(1).await;
        let backend = GeminiBackend::with_host(&server.url(), "test-key", "gemini-2.0-flash");

        assert!(matches!(
            backend.generate("hello").await,
            Err(Error::RateLimited)
        ));
        // subsequent request is served
        assert!(backend.generate("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_openai_backend_over_http() {
        let server = MockLlmServer::start().await;
        let backend = OpenAiCompatBackend::with_api_key(&server.url(), "gpt-3.5-turbo", "k");

        let advice = backend.generate("What about my savings?").await.unwrap();
        assert_eq!(advice, MOCK_ADVICE);
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_openai_backend_maps_429() {
        let server = MockLlmServer::start_with_rate_limits(1).await;
        let backend = OpenAiCompatBackend::new(&server.url(), "gpt-3.5-turbo");

        assert!(matches!(
            backend.generate("hello").await,
            Err(Error::RateLimited)
        ));
    }
}

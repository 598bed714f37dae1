//! Pluggable text-generation backend abstraction
//!
//! This module provides a backend-agnostic interface for the LLM operations
//! behind the advisor chat and the learning content loader.
//!
//! # Architecture
//!
//! - `LlmBackend` trait: defines the interface for text generation
//! - `LlmClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAiCompatBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `LLM_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: Gemini API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `GEMINI_HOST`: Override for the Gemini endpoint (testing)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod gemini;
mod mock;
mod openai_compat;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MOCK_ADVICE};
pub use openai_compat::OpenAiCompatBackend;

#[cfg(any(test, feature = "test-utils"))]
pub(crate) use mock::canned_response;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all text-generation backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate text for a prompt, returned verbatim.
    ///
    /// A provider 429 response surfaces as [`crate::Error::RateLimited`] so
    /// callers can decide whether to retry.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete LLM client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LlmClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions API
    OpenAiCompatible(OpenAiCompatBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl LlmClient {
    /// Create an LLM client from environment variables
    ///
    /// Checks `LLM_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY and GEMINI_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("LLM_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(LlmClient::Gemini),
            "openai_compatible" | "openai" => {
                OpenAiCompatBackend::from_env().map(LlmClient::OpenAiCompatible)
            }
            "mock" => Some(LlmClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown LLM_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(LlmClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        LlmClient::Gemini(GeminiBackend::new(api_key, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        LlmClient::Mock(MockBackend::new())
    }
}

// Implement LlmBackend for LlmClient by delegating to the inner backend
#[async_trait]
impl LlmBackend for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            LlmClient::Gemini(b) => b.generate(prompt).await,
            LlmClient::OpenAiCompatible(b) => b.generate(prompt).await,
            LlmClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LlmClient::Gemini(b) => b.health_check().await,
            LlmClient::OpenAiCompatible(b) => b.health_check().await,
            LlmClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmClient::Gemini(b) => b.model(),
            LlmClient::OpenAiCompatible(b) => b.model(),
            LlmClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            LlmClient::Gemini(b) => b.host(),
            LlmClient::OpenAiCompatible(b) => b.host(),
            LlmClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_client_mock() {
        let client = LlmClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = LlmClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_generate_nonempty() {
        let client = LlmClient::mock();
        let text = client.generate("What should I do with my savings?").await.unwrap();
        assert!(!text.is_empty());
    }
}

//! Mock backend for testing
//!
//! Provides deterministic responses for all prompt shapes used by the app.
//! Useful for unit tests and development without provider credentials.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Error, Result};

use super::LlmBackend;

/// Canned advice returned for any non-structured prompt
pub const MOCK_ADVICE: &str =
    "Based on your balance and recent spending, keep building your emergency fund \
     and review your largest expense category for savings opportunities.";

/// Mock text-generation backend
///
/// Recognizes the quiz/quotes/blogs request prompts and returns well-formed
/// JSON arrays of the expected lengths; any other prompt gets a canned
/// advice string. Failure modes are configurable for tests.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether generate should always fail
    fail: bool,
    /// Remaining number of calls that return `Error::RateLimited`
    rate_limits_remaining: Arc<AtomicU32>,
    /// Fixed response overriding the canned ones (tests)
    scripted: Option<Arc<str>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Self::default()
        }
    }

    /// Create an unhealthy mock backend whose generate calls fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Create a mock that returns 429 for the first `n` calls, then succeeds
    pub fn rate_limited(n: u32) -> Self {
        Self {
            healthy: true,
            rate_limits_remaining: Arc::new(AtomicU32::new(n)),
            ..Self::default()
        }
    }

    /// Create a mock that returns the same response for every prompt
    pub fn scripted(response: &str) -> Self {
        Self {
            healthy: true,
            scripted: Some(Arc::from(response)),
            ..Self::default()
        }
    }

    /// Remaining calls that will still be rate limited
    pub fn rate_limits_remaining(&self) -> u32 {
        self.rate_limits_remaining.load(Ordering::SeqCst)
    }
}

/// Deterministic response for any prompt the app sends; shared with the
/// mock HTTP server in test_utils.
pub(crate) fn canned_response(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    if lower.contains("quiz") {
        canned_quiz()
    } else if lower.contains("quotes") {
        canned_quotes()
    } else if lower.contains("blog") {
        canned_blogs()
    } else {
        MOCK_ADVICE.to_string()
    }
}

fn canned_quiz() -> String {
    let questions: Vec<_> = (1..=10)
        .map(|i| {
            json!({
                "question": format!("Mock question {}?", i),
                "options": ["Option A", "Option B", "Option C", "Option D"],
                "correctAnswer": (i - 1) % 4,
                "explanation": format!("Mock explanation {}", i),
            })
        })
        .collect();
    serde_json::to_string(&questions).expect("mock quiz serializes")
}

fn canned_quotes() -> String {
    let quotes: Vec<_> = (1..=3)
        .map(|i| {
            json!({
                "text": format!("Mock quote {}", i),
                "author": format!("Mock Author {}", i),
            })
        })
        .collect();
    serde_json::to_string(&quotes).expect("mock quotes serialize")
}

fn canned_blogs() -> String {
    let blogs: Vec<_> = (1..=3)
        .map(|i| {
            json!({
                "title": format!("Mock blog post {}", i),
                "url": "https://example.com/finance",
                "source": "Example Finance",
                "date": "Jan 1, 2025",
            })
        })
        .collect();
    serde_json::to_string(&blogs).expect("mock blogs serialize")
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.fail {
            return Err(Error::InvalidData("mock backend configured to fail".into()));
        }

        let remaining = self.rate_limits_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rate_limits_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::RateLimited);
        }

        if let Some(ref scripted) = self.scripted {
            return Ok(scripted.to_string());
        }

        Ok(canned_response(prompt))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quiz_prompt_yields_ten_items() {
        let backend = MockBackend::new();
        let response = backend
            .generate("Generate 10 financial literacy quiz questions.")
            .await
            .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed.len(), 10);
    }

    #[tokio::test]
    async fn test_advice_prompt_yields_text() {
        let backend = MockBackend::new();
        let response = backend.generate("Should I pay off my loan early?").await.unwrap();
        assert_eq!(response, MOCK_ADVICE);
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockBackend::failing();
        assert!(backend.generate("anything").await.is_err());
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_rate_limited_then_succeeds() {
        let backend = MockBackend::rate_limited(2);
        assert!(matches!(backend.generate("hi").await, Err(Error::RateLimited)));
        assert!(matches!(backend.generate("hi").await, Err(Error::RateLimited)));
        assert!(backend.generate("hi").await.is_ok());
        assert_eq!(backend.rate_limits_remaining(), 0);
    }
}

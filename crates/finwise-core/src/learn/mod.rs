//! Learning content loader
//!
//! Fetches three independent content sets (quiz questions, quotes, blog
//! links) from the text-generation backend and validates each against a
//! fixed shape. Any request failure, parse failure, or shape mismatch
//! yields the built-in fallback set for that content type; the three sets
//! degrade independently. Rate-limit responses (and only those) are retried
//! a small fixed number of times with a fixed backoff.

pub mod fallback;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::warn;

use crate::error::{Error, Result};
use crate::llm::{parsing, LlmBackend, LlmClient};

/// Expected quiz length
pub const QUIZ_LEN: usize = 10;
/// Expected quote count
pub const QUOTES_LEN: usize = 3;
/// Expected blog count
pub const BLOGS_LEN: usize = 3;

/// Total generate attempts for a rate-limited request
const MAX_ATTEMPTS: u32 = 3;
/// Fixed delay between rate-limit retries
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// A multiple-choice quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`, 0–3
    pub correct_answer: usize,
    pub explanation: String,
}

/// An inspirational finance quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// A linked blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub url: String,
    pub source: String,
    pub date: String,
}

/// Where a content set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Validated output of the generation backend
    Generated,
    /// The built-in fallback dataset
    Fallback,
}

/// A content set tagged with its origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSet<T> {
    pub items: Vec<T>,
    pub source: ContentSource,
}

impl<T> ContentSet<T> {
    fn generated(items: Vec<T>) -> Self {
        Self {
            items,
            source: ContentSource::Generated,
        }
    }

    fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            source: ContentSource::Fallback,
        }
    }
}

/// The full learning page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningContent {
    pub quiz: ContentSet<QuizQuestion>,
    pub quotes: ContentSet<Quote>,
    pub blogs: ContentSet<BlogPost>,
}

/// Message shown for a finished quiz score
pub fn score_message(score: usize, total: usize) -> &'static str {
    if total == 0 {
        return "Keep studying! Financial literacy is a journey!";
    }
    let percentage = score as f64 / total as f64 * 100.0;
    if percentage >= 90.0 {
        "Outstanding! You're a financial expert!"
    } else if percentage >= 70.0 {
        "Great job! You have solid financial knowledge!"
    } else if percentage >= 50.0 {
        "Good effort! Keep learning!"
    } else {
        "Keep studying! Financial literacy is a journey!"
    }
}

const QUIZ_PROMPT: &str = "Generate 10 financial literacy quiz questions.\n\
Format as JSON array with:\n\
- question: string\n\
- options: array of 4 strings\n\
- correctAnswer: number (0-3)\n\
- explanation: string\n\n\
Focus on practical personal finance topics.";

const QUOTES_PROMPT: &str = "Generate 3 inspiring financial quotes with authors.\n\
Format as JSON array with:\n\
- text: string (the quote)\n\
- author: string (full name)\n\n\
Use verified quotes from well-known financial experts.";

const BLOGS_PROMPT: &str = "Generate 3 financial blog post ideas.\n\
Format as JSON array with:\n\
- title: string\n\
- url: string (use major financial sites)\n\
- source: string (publication name)\n\
- date: string (current date)\n\n\
Focus on current financial trends.";

/// Loads quiz/quote/blog content with per-set fallback
#[derive(Clone)]
pub struct LearningContentLoader {
    llm: LlmClient,
}

impl LearningContentLoader {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Load all three content sets; the fetches run concurrently and
    /// degrade independently.
    pub async fn load(&self) -> LearningContent {
        let (quiz, quotes, blogs) = tokio::join!(self.quiz(), self.quotes(), self.blogs());
        LearningContent {
            quiz,
            quotes,
            blogs,
        }
    }

    /// Fetch the quiz set (10 questions, 4 options each)
    pub async fn quiz(&self) -> ContentSet<QuizQuestion> {
        self.fetch_set("quiz", QUIZ_PROMPT, fallback::quiz, |items: &[QuizQuestion]| {
            items.len() == QUIZ_LEN
                && items
                    .iter()
                    .all(|q| q.options.len() == 4 && q.correct_answer < 4)
        })
        .await
    }

    /// Fetch the quote set (exactly 3)
    pub async fn quotes(&self) -> ContentSet<Quote> {
        self.fetch_set("quotes", QUOTES_PROMPT, fallback::quotes, |items: &[Quote]| {
            items.len() == QUOTES_LEN
        })
        .await
    }

    /// Fetch the blog set (exactly 3)
    pub async fn blogs(&self) -> ContentSet<BlogPost> {
        self.fetch_set("blogs", BLOGS_PROMPT, fallback::blogs, |items: &[BlogPost]| {
            items.len() == BLOGS_LEN
        })
        .await
    }

    async fn fetch_set<T, V>(
        &self,
        kind: &str,
        prompt: &str,
        fallback_fn: fn() -> Vec<T>,
        validate: V,
    ) -> ContentSet<T>
    where
        T: serde::de::DeserializeOwned,
        V: Fn(&[T]) -> bool,
    {
        let response = match self.generate_with_retry(prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(kind, error = %e, "Content generation failed, using fallback");
                return ContentSet::fallback(fallback_fn());
            }
        };

        match parsing::parse_array::<T>(&response) {
            Ok(items) if validate(&items) => ContentSet::generated(items),
            Ok(items) => {
                warn!(kind, got = items.len(), "Generated content failed shape validation, using fallback");
                ContentSet::fallback(fallback_fn())
            }
            Err(e) => {
                warn!(kind, error = %e, "Generated content failed to parse, using fallback");
                ContentSet::fallback(fallback_fn())
            }
        }
    }

    /// Generate with retries on rate-limit responses only
    async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.llm.generate(prompt).await {
                Err(Error::RateLimited) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, "Rate limited, retrying after backoff");
                    sleep(RETRY_BACKOFF).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockBackend;

    #[tokio::test]
    async fn test_load_with_mock_is_fully_generated() {
        let loader = LearningContentLoader::new(LlmClient::mock());
        let content = loader.load().await;

        assert_eq!(content.quiz.source, ContentSource::Generated);
        assert_eq!(content.quiz.items.len(), QUIZ_LEN);
        assert_eq!(content.quotes.source, ContentSource::Generated);
        assert_eq!(content.quotes.items.len(), QUOTES_LEN);
        assert_eq!(content.blogs.source, ContentSource::Generated);
        assert_eq!(content.blogs.items.len(), BLOGS_LEN);
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallbacks() {
        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::failing()));
        let content = loader.load().await;

        assert_eq!(content.quiz.source, ContentSource::Fallback);
        assert_eq!(content.quiz.items.len(), QUIZ_LEN);
        assert_eq!(content.quotes.source, ContentSource::Fallback);
        assert_eq!(content.quotes.items.len(), QUOTES_LEN);
        assert_eq!(content.blogs.source, ContentSource::Fallback);
        assert_eq!(content.blogs.items.len(), BLOGS_LEN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retry_recovers() {
        // two 429s, third attempt succeeds: within the retry budget
        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::rate_limited(2)));
        let quotes = loader.quotes().await;
        assert_eq!(quotes.source, ContentSource::Generated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_budget_exhausted() {
        // more 429s than attempts: falls back
        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::rate_limited(10)));
        let quotes = loader.quotes().await;
        assert_eq!(quotes.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_wrong_length_yields_fallback_verbatim() {
        // a well-formed quiz array of the wrong length
        let three: Vec<QuizQuestion> = fallback::quiz().into_iter().take(3).collect();
        let response = serde_json::to_string(&three).unwrap();

        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::scripted(&response)));
        let quiz = loader.quiz().await;
        assert_eq!(quiz.source, ContentSource::Fallback);
        assert_eq!(quiz.items.len(), QUIZ_LEN);
        assert_eq!(quiz.items[0].question, fallback::quiz()[0].question);
    }

    #[tokio::test]
    async fn test_out_of_range_answer_yields_fallback() {
        let mut questions = fallback::quiz();
        questions[4].correct_answer = 7;
        let response = serde_json::to_string(&questions).unwrap();

        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::scripted(&response)));
        let quiz = loader.quiz().await;
        assert_eq!(quiz.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_non_array_response_yields_fallback() {
        let loader = LearningContentLoader::new(LlmClient::Mock(MockBackend::scripted(
            "Sorry, I can't produce JSON today.",
        )));
        let quotes = loader.quotes().await;
        assert_eq!(quotes.source, ContentSource::Fallback);
        assert_eq!(quotes.items.len(), QUOTES_LEN);
    }

    #[test]
    fn test_score_message_tiers() {
        assert!(score_message(10, 10).starts_with("Outstanding"));
        assert!(score_message(9, 10).starts_with("Outstanding"));
        assert!(score_message(7, 10).starts_with("Great job"));
        assert!(score_message(5, 10).starts_with("Good effort"));
        assert!(score_message(2, 10).starts_with("Keep studying"));
        assert!(score_message(0, 0).starts_with("Keep studying"));
    }
}

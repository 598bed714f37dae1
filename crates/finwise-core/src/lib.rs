//! FinWise Core Library
//!
//! Shared functionality for the FinWise personal finance assistant:
//! - Domain models and the currency catalog
//! - Feature state containers with derived metrics (expenses, goals,
//!   investments, emergency fund)
//! - Pluggable text-generation backends (Gemini, OpenAI-compatible)
//! - Open-banking sandbox gateway for advisor context data
//! - Advice generation with context assembly and degraded fallback
//! - Chat orchestration with single-in-flight submission
//! - Learning content loader with fallback datasets
//! - Auth/profile gateway with cache hierarchy and durable local store

pub mod advisor;
pub mod auth;
pub mod banking;
pub mod chat;
pub mod currency;
pub mod error;
pub mod learn;
pub mod llm;
pub mod models;
pub mod trackers;

/// Test utilities including a mock LLM HTTP server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{AdviceGenerator, AdvisorContext, APOLOGY_PREFIX};
pub use auth::{
    AuthConfig, AuthUser, IdentityClient, IdentityProvider, LocalStore, ProfileStore,
    ProfileStoreClient, Session, SessionManager,
};
pub use banking::{AccountBalance, BankBackend, BankClient, BankTransaction};
pub use chat::{ChatLog, ChatOrchestrator, ChatState, CONNECTION_APOLOGY, GREETING};
pub use error::{AuthError, Error, Result};
pub use learn::{
    BlogPost, ContentSet, ContentSource, LearningContent, LearningContentLoader, QuizQuestion,
    Quote,
};
pub use llm::{GeminiBackend, LlmBackend, LlmClient, MockBackend, OpenAiCompatBackend};
pub use models::{
    ChatMessage, Expense, ExpenseCategory, Frequency, Investment, InvestmentKind, SavingsGoal,
    Sender, UserProfile,
};
pub use trackers::{EmergencyFund, ExpenseTracker, GoalTracker, InvestmentTracker};

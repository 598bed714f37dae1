//! Error types for FinWise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Authentication errors with user-facing messages.
///
/// Provider-specific error codes are mapped into these variants at the
/// gateway boundary; the Display strings are what the UI shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("This email is already registered")]
    EmailInUse,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("All fields are required")]
    MissingFields,

    #[error("Login failed. Please check your credentials.")]
    InvalidCredentials,

    #[error("Network error. Please check your connection.")]
    Network,

    #[error("Authentication failed: {0}")]
    Provider(String),
}

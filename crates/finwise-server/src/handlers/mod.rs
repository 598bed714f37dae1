//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod chat;
pub mod emergency;
pub mod expenses;
pub mod goals;
pub mod health;
pub mod investments;
pub mod learn;
pub mod settings;

// Re-export all handlers for use in router
pub use auth::*;
pub use chat::*;
pub use emergency::*;
pub use expenses::*;
pub use goals::*;
pub use health::*;
pub use investments::*;
pub use learn::*;
pub use settings::*;

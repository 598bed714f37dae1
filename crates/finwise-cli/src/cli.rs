//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use clap::{Parser, Subcommand};

/// FinWise - personal finance assistant
#[derive(Parser)]
#[command(name = "finwise")]
#[command(about = "AI-assisted personal finance dashboards and advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (local development only)
        #[arg(long)]
        no_auth: bool,

        /// Allowed CORS origin (repeatable)
        #[arg(long)]
        allowed_origin: Vec<String>,
    },

    /// Ask the AI advisor a one-off question
    Advise {
        /// The question to ask
        question: String,
    },

    /// Fetch the learning content sets (quiz, quotes, blogs)
    Learn,

    /// Show backend configuration and reachability
    Status,
}

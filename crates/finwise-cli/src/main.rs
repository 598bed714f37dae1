//! FinWise CLI - personal finance assistant
//!
//! Usage:
//!   finwise serve --port 3000     Start the web server
//!   finwise advise "question"     One-off AI advisor question
//!   finwise learn                 Fetch quiz/quotes/blog content
//!   finwise status                Show backend configuration

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            no_auth,
            allowed_origin,
        } => commands::cmd_serve(&host, port, no_auth, allowed_origin).await,
        Commands::Advise { question } => commands::cmd_advise(&question).await,
        Commands::Learn => commands::cmd_learn().await,
        Commands::Status => commands::cmd_status().await,
    }
}

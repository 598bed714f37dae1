//! Command implementations

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use finwise_core::{
    AdviceGenerator, BankClient, ChatOrchestrator, ContentSource, LearningContentLoader,
    LlmBackend, LlmClient, LocalStore,
};
use finwise_server::{AppState, ServerConfig};

/// Start the web server
pub async fn cmd_serve(
    host: &str,
    port: u16,
    no_auth: bool,
    allowed_origins: Vec<String>,
) -> Result<()> {
    if no_auth {
        info!("⚠️  Authentication disabled (--no-auth); all requests run as local-dev");
    }

    let config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
    };
    let state = Arc::new(AppState::from_env(config));
    let addr = format!("{}:{}", host, port);
    finwise_server::serve(&addr, state).await
}

fn llm_from_env() -> Result<LlmClient> {
    match LlmClient::from_env() {
        Some(client) => Ok(client),
        None => bail!(
            "LLM backend not configured. Set GEMINI_API_KEY (or LLM_BACKEND=openai_compatible \
             with OPENAI_COMPATIBLE_HOST)."
        ),
    }
}

/// One-off advisor question through the chat orchestrator
pub async fn cmd_advise(question: &str) -> Result<()> {
    let llm = llm_from_env()?;
    let advisor = AdviceGenerator::new(BankClient::from_env(), llm);
    let mut chat = ChatOrchestrator::new(advisor);

    match chat.send(question).await {
        Some(reply) => {
            println!("{}", reply.text);
            Ok(())
        }
        None => bail!("Question must not be empty"),
    }
}

/// Fetch and print the learning content sets
pub async fn cmd_learn() -> Result<()> {
    let loader = LearningContentLoader::new(llm_from_env()?);
    let content = loader.load().await;

    let label = |source: ContentSource| match source {
        ContentSource::Generated => "generated",
        ContentSource::Fallback => "fallback",
    };

    println!("Quiz ({}):", label(content.quiz.source));
    for (i, q) in content.quiz.items.iter().enumerate() {
        println!("  {}. {}", i + 1, q.question);
        for (j, option) in q.options.iter().enumerate() {
            let marker = if j == q.correct_answer { "*" } else { " " };
            println!("     {} {}", marker, option);
        }
    }

    println!("\nQuotes ({}):", label(content.quotes.source));
    for quote in &content.quotes.items {
        println!("  \"{}\" - {}", quote.text, quote.author);
    }

    println!("\nBlogs ({}):", label(content.blogs.source));
    for blog in &content.blogs.items {
        println!("  {} ({}, {}) {}", blog.title, blog.source, blog.date, blog.url);
    }

    Ok(())
}

/// Show backend configuration and reachability
pub async fn cmd_status() -> Result<()> {
    match LlmClient::from_env() {
        Some(llm) => {
            let healthy = llm.health_check().await;
            println!("LLM backend:   {} (model: {})", llm.host(), llm.model());
            println!("LLM healthy:   {}", healthy);
        }
        None => println!("LLM backend:   not configured"),
    }

    let bank = match BankClient::from_env() {
        BankClient::OpenBank(_) => "open-banking sandbox",
        BankClient::Mock(_) => "mock",
    };
    println!("Bank source:   {}", bank);

    let identity = if std::env::var("FIREBASE_API_KEY").is_ok() {
        "firebase"
    } else {
        "not configured (mock)"
    };
    println!("Identity:      {}", identity);

    let local = LocalStore::open_default();
    println!("Local store:   {}", local.path().display());
    println!("Dark mode:     {}", local.dark_mode());

    Ok(())
}

//! Svar CLI entry point.

use anyhow::Result;
use clap::Parser;
use svar::cli::{commands, Cli, Commands};
use svar::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("svar={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Ask {
            question,
            transcript,
            embeddings,
            model,
            top_k,
        } => {
            commands::run_ask(&question, transcript, embeddings, model, top_k, settings).await?;
        }

        Commands::Search {
            query,
            transcript,
            embeddings,
            top_k,
        } => {
            commands::run_search(&query, transcript, embeddings, top_k, settings).await?;
        }

        Commands::Chat {
            transcript,
            embeddings,
            model,
        } => {
            commands::run_chat(transcript, embeddings, model, settings).await?;
        }

        Commands::Export { transcript, output } => {
            commands::run_export(&transcript, output, settings).await?;
        }

        Commands::Metadata { transcript, output } => {
            commands::run_metadata(&transcript, output, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}

//! Ask command implementation.

use super::load_index;
use crate::cli::Output;
use crate::config::Settings;
use crate::index::SearchOutcome;
use crate::qa::QaEngine;
use anyhow::Result;
use std::path::PathBuf;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    transcript: Option<PathBuf>,
    embeddings: Option<PathBuf>,
    model: Option<String>,
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let index = load_index(transcript.as_deref(), embeddings.as_deref(), &settings).await?;

    let mut qa_settings = settings.qa.clone();
    if let Some(model) = model {
        qa_settings.model = model;
    }
    if let Some(top_k) = top_k {
        qa_settings.top_k = top_k;
    }

    let engine = QaEngine::new(index, qa_settings)?;

    let spinner = Output::spinner("Generating answer...");
    let response = engine.ask(question).await;
    spinner.finish_and_clear();

    match response {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if let SearchOutcome::Found(chunks) = &response.context {
                Output::header("Context");
                for (rank, chunk) in chunks.iter().enumerate() {
                    Output::search_result(rank + 1, chunk.position, chunk.distance, &chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

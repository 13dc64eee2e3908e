//! Search command implementation.

use super::load_index;
use crate::cli::Output;
use crate::config::Settings;
use crate::index::SearchOutcome;
use anyhow::Result;
use std::path::PathBuf;

/// Run the search command.
pub async fn run_search(
    query: &str,
    transcript: Option<PathBuf>,
    embeddings: Option<PathBuf>,
    top_k: usize,
    settings: Settings,
) -> Result<()> {
    let index = load_index(transcript.as_deref(), embeddings.as_deref(), &settings).await?;

    let spinner = Output::spinner("Searching...");
    let outcome = index.search(query, top_k).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(SearchOutcome::NoIndex) => {
            Output::warning("No embeddings found. Index a transcript first.");
        }
        Ok(SearchOutcome::NoRelevantMatch) => {
            Output::warning("No relevant chunks found for this query.");
        }
        Ok(SearchOutcome::Found(chunks)) => {
            Output::success(&format!("Found {} chunks", chunks.len()));
            for (rank, chunk) in chunks.iter().enumerate() {
                Output::search_result(rank + 1, chunk.position, chunk.distance, &chunk.text);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

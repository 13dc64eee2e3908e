//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod export;
mod metadata;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use export::run_export;
pub use metadata::run_metadata;
pub use search::run_search;

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::{IndexSnapshot, SemanticIndex};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Build a populated index from either a transcript file or a previously
/// exported embeddings file.
///
/// Exactly one of the two sources must be given. Reloading an embeddings
/// file skips re-embedding entirely; a snapshot produced by a different
/// embedding model is refused since its distances would be meaningless here.
pub(crate) async fn load_index(
    transcript: Option<&Path>,
    embeddings: Option<&Path>,
    settings: &Settings,
) -> Result<Arc<SemanticIndex>> {
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?);
    let index = Arc::new(SemanticIndex::with_chunking(
        embedder,
        settings.chunking.to_config(),
    ));

    match (transcript, embeddings) {
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)?;
            let spinner = Output::spinner("Chunking and embedding transcript...");
            let result = index.store(&text).await;
            spinner.finish_and_clear();
            let count = result?;
            Output::success(&format!("Indexed {} chunks", count));
        }
        (None, Some(path)) => {
            let content = std::fs::read_to_string(path)?;
            let snapshot = IndexSnapshot::from_json(&content)?;
            if snapshot.model != settings.embedding.model {
                anyhow::bail!(
                    "Embeddings file was produced by model '{}' but '{}' is configured; \
                     re-export the transcript",
                    snapshot.model,
                    settings.embedding.model
                );
            }
            let count = index.rebuild(snapshot.entries)?;
            Output::success(&format!("Loaded {} chunks from {}", count, path.display()));
        }
        _ => {
            anyhow::bail!("Provide exactly one of --transcript or --embeddings");
        }
    }

    Ok(index)
}

//! Export command implementation.
//!
//! Chunks and embeds a transcript, then writes the (chunk, vector) pairs as
//! JSON so an external store can rebuild the index later without
//! re-embedding.

use super::load_index;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the export command.
pub async fn run_export(
    transcript: &PathBuf,
    output: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    let index = load_index(Some(transcript.as_path()), None, &settings).await?;

    let snapshot = index
        .snapshot(&settings.embedding.model)
        .ok_or_else(|| anyhow::anyhow!("Index is empty after store"))?;

    let json = snapshot.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            Output::success(&format!(
                "Exported {} chunks ({} dimensions) to {}",
                snapshot.entries.len(),
                snapshot.dimensions,
                path.display()
            ));
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

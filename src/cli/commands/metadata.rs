//! Metadata command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::metadata::MetadataGenerator;
use anyhow::Result;
use std::path::PathBuf;

/// Run the metadata command.
pub async fn run_metadata(
    transcript: &PathBuf,
    output: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    let text = std::fs::read_to_string(transcript)?;

    let generator = MetadataGenerator::new(settings.metadata.clone())?;

    let spinner = Output::spinner("Generating metadata...");
    let result = generator.generate(&text).await;
    spinner.finish_and_clear();

    let metadata = match result {
        Ok(m) => m,
        Err(e) => {
            Output::error(&format!("Metadata generation failed: {}", e));
            return Err(e.into());
        }
    };

    let json = serde_json::to_string_pretty(&metadata)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            Output::success(&format!("Wrote metadata to {}", path.display()));
        }
        None => {
            Output::header(&metadata.title);
            Output::kv("Summary", &metadata.short_description);
            Output::kv("Category", &metadata.category);
            Output::kv("Audience", &metadata.target_audience);
            println!("\n{}", json);
        }
    }

    Ok(())
}

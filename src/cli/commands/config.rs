//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            // Effective settings: file values merged over defaults.
            let rendered = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to render config: {}", e))?;
            print!("{}", rendered);
        }

        ConfigAction::Init { force } => {
            let path = Settings::default_config_path();

            if path.exists() && !force {
                Output::warning(&format!("Config already exists at {}", path.display()));
                Output::info("Pass --force to overwrite it with the effective settings.");
                return Ok(());
            }

            settings.save_to(&path)?;
            Output::success(&format!("Wrote config to {}", path.display()));
            Output::info("Edit it to change models, chunking, or retrieval settings.");
        }

        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }
    }

    Ok(())
}

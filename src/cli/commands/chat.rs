//! Interactive question-answering session.

use super::load_index;
use crate::cli::Output;
use crate::config::Settings;
use crate::index::SearchOutcome;
use crate::qa::QaEngine;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Run the interactive chat command.
pub async fn run_chat(
    transcript: Option<PathBuf>,
    embeddings: Option<PathBuf>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    let index = load_index(transcript.as_deref(), embeddings.as_deref(), &settings).await?;

    let mut qa_settings = settings.qa.clone();
    if let Some(model) = model {
        qa_settings.model = model;
    }

    if let Some(stats) = index.stats() {
        Output::info(&format!(
            "{} chunks indexed ({} dimensions)",
            stats.chunks, stats.dimensions
        ));
    }

    let engine = QaEngine::new(index, qa_settings)?;

    println!("\n{}", style("Svar Chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        match engine.ask(input).await {
            Ok(response) => {
                println!("\n{} {}\n", style("Svar:").cyan().bold(), response.answer);
                if let SearchOutcome::Found(chunks) = &response.context {
                    println!(
                        "{}\n",
                        style(format!(
                            "({} context chunks, best distance {:.4})",
                            chunks.len(),
                            chunks.first().map(|c| c.distance).unwrap_or_default()
                        ))
                        .dim()
                    );
                }
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

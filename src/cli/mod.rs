//! CLI module for Svar.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Svar - Transcript Search and QA
///
/// A CLI tool for semantic search and question answering over transcripts.
/// The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question and get an answer grounded in the transcript
    Ask {
        /// The question to ask
        question: String,

        /// Plain-text transcript file to index
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// Previously exported embeddings file to reload instead
        #[arg(short, long)]
        embeddings: Option<PathBuf>,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of context chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Search the transcript for relevant chunks
    Search {
        /// Search query
        query: String,

        /// Plain-text transcript file to index
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// Previously exported embeddings file to reload instead
        #[arg(short, long)]
        embeddings: Option<PathBuf>,

        /// Number of chunks to return
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,
    },

    /// Start an interactive question-answering session
    Chat {
        /// Plain-text transcript file to index
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// Previously exported embeddings file to reload instead
        #[arg(short, long)]
        embeddings: Option<PathBuf>,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Chunk and embed a transcript, writing the embeddings to a file
    Export {
        /// Plain-text transcript file to index
        transcript: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate structured metadata for a transcript
    Metadata {
        /// Plain-text transcript file
        transcript: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write the effective configuration to the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

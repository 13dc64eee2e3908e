//! Svar - Transcript Search and QA
//!
//! A CLI tool for semantic search and question answering over transcripts.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Chunk a transcript into overlapping windows and embed it
//! - Search the transcript semantically for relevant passages
//! - Ask questions answered strictly from the transcript content
//! - Export chunk embeddings for external persistence and reload them later
//!
//! Transcription itself happens upstream: Svar consumes plain text produced
//! by whatever transcription or document-extraction tool you use.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `chunking` - Sliding-window transcript chunking
//! - `embedding` - Embedding generation
//! - `index` - In-memory exact nearest-neighbor index
//! - `qa` - Question answering over retrieved context
//! - `metadata` - LLM-generated transcript metadata
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svar::config::Settings;
//! use svar::embedding::OpenAIEmbedder;
//! use svar::index::SemanticIndex;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let embedder = Arc::new(OpenAIEmbedder::with_config(
//!         &settings.embedding.model,
//!         settings.embedding.dimensions as usize,
//!     )?);
//!     let index = SemanticIndex::with_chunking(embedder, settings.chunking.to_config());
//!
//!     index.store("the transcript text...").await?;
//!     let outcome = index.search("what was discussed?", 3).await?;
//!     println!("{}", outcome.context());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod metadata;
pub mod openai;
pub mod qa;

pub use error::{Result, SvarError};

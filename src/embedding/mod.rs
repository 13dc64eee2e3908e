//! Embedding generation.
//!
//! The index treats the embedding model as an external collaborator: chunk
//! text goes in, fixed-dimension vectors come out. This trait pins down the
//! two properties retrieval depends on: a batch yields one vector per input
//! in input order (a batch of one yields exactly one vector), and the
//! dimension stays stable for the lifetime of a model identity, so stored
//! vectors and query vectors share one distance space.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// An embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single query or chunk.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of chunks, returning vectors in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors this model produces.
    fn dimensions(&self) -> usize;
}

//! Embedder backed by the OpenAI embeddings API.

use super::Embedder;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chunks per embeddings request. A single transcript yields at most a few
/// hundred chunks, so a store usually needs one or two requests.
const MAX_BATCH: usize = 100;

/// Embedder calling the OpenAI embeddings API.
///
/// Every response vector is checked against the configured dimension before
/// it reaches the index, so the index can never be built from a mix of
/// distance spaces.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder for the given model and dimension.
    pub fn with_config(model: &str, dimensions: usize) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            dimensions,
        })
    }

    /// The model identity this embedder encodes with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one embeddings request and validate the response shape.
    async fn request(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(batch.to_vec()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| {
                SvarError::Embedding(format!("Failed to build embedding request: {}", e))
            })?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Embedding API error: {}", e)))?;

        collect_vectors(
            batch.len(),
            self.dimensions,
            response
                .data
                .into_iter()
                .map(|d| (d.index as usize, d.embedding)),
        )
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| SvarError::Embedding("Embedding response was empty".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            vectors.extend(self.request(batch).await?);
        }

        debug!("Embedded {} texts", vectors.len());
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Re-slot response vectors by their reported input index and enforce the
/// configured dimension on each.
///
/// The API reports which input each vector belongs to; slotting by that index
/// restores input order regardless of response order, and a missing, stray,
/// or wrongly-sized vector is an embedding error rather than a silently
/// misaligned index.
fn collect_vectors(
    expected: usize,
    dimensions: usize,
    data: impl IntoIterator<Item = (usize, Vec<f32>)>,
) -> Result<Vec<Vec<f32>>> {
    let mut slots: Vec<Option<Vec<f32>>> = (0..expected).map(|_| None).collect();

    for (index, vector) in data {
        if vector.len() != dimensions {
            return Err(SvarError::Embedding(format!(
                "Model returned a {}-dimension vector, expected {}",
                vector.len(),
                dimensions
            )));
        }
        match slots.get_mut(index) {
            Some(slot) => *slot = Some(vector),
            None => {
                return Err(SvarError::Embedding(format!(
                    "Response index {} is outside the batch of {}",
                    index, expected
                )))
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| {
                SvarError::Embedding(format!("Response is missing a vector for input {}", i))
            })
        })
        .collect()
}

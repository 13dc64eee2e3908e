//! In-memory semantic index over transcript chunks.
//!
//! Owns the current chunk sequence and its embedding vectors as a single
//! collection of records, supports full rebuilds from new text ("store") and
//! ranked nearest-neighbor retrieval ("search"). The index is exact: every
//! query is compared against every stored vector by squared Euclidean
//! distance, which is the right trade-off for single-document corpora of
//! hundreds to low thousands of chunks.

use crate::chunking::{chunk_text, ChunkingConfig};
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument};

/// Sentinel rendered when searching before anything has been stored.
pub const NO_EMBEDDINGS_SENTINEL: &str = "(No embeddings found)";

/// Sentinel rendered when retrieval only surfaces blank chunks.
pub const NO_RELEVANT_CONTEXT_SENTINEL: &str = "(No relevant context found for this question.)";

/// Separator between chunks in an assembled context string.
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// A chunk of text bound to the vector it was embedded into.
///
/// Keeping text and vector in one record means the chunk sequence and the
/// vector collection cannot drift out of sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Chunk text.
    pub text: String,
    /// Embedding vector for the chunk.
    pub vector: Vec<f32>,
}

/// A retrieved chunk with its rank information.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Position of the chunk in the stored sequence.
    pub position: usize,
    /// Squared Euclidean distance to the query (lower is better).
    pub distance: f32,
    /// Chunk text.
    pub text: String,
}

/// Outcome of a search.
///
/// "No index yet" and "nothing relevant" are normal outcomes, not errors, and
/// they are kept distinct so callers can surface different guidance for each.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// No store has succeeded yet; there is nothing to search.
    NoIndex,
    /// Retrieval ran but every returned chunk was blank.
    NoRelevantMatch,
    /// Ranked chunks, most relevant first.
    Found(Vec<ScoredChunk>),
}

impl SearchOutcome {
    /// Assemble the context string handed to answer generation.
    pub fn context(&self) -> String {
        match self {
            SearchOutcome::NoIndex => NO_EMBEDDINGS_SENTINEL.to_string(),
            SearchOutcome::NoRelevantMatch => NO_RELEVANT_CONTEXT_SENTINEL.to_string(),
            SearchOutcome::Found(chunks) => chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR),
        }
    }

    /// Whether the outcome carries usable context.
    pub fn has_context(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Summary of the currently populated index.
#[derive(Debug, Clone)]
pub struct IndexStats {
    /// Number of indexed chunks.
    pub chunks: usize,
    /// Embedding dimensions.
    pub dimensions: usize,
    /// When the index was built.
    pub built_at: DateTime<Utc>,
}

/// Serializable dump of an index for external persistence.
///
/// Records the embedding model so a snapshot cannot be silently reloaded
/// under a different distance space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Embedding model that produced the vectors.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: usize,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Chunk/vector pairs in storage order.
    pub entries: Vec<IndexEntry>,
}

impl IndexSnapshot {
    /// Render the snapshot as JSON for a persistence collaborator.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot previously produced by [`IndexSnapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The populated state: an immutable chunk/vector sequence.
struct IndexState {
    entries: Vec<IndexEntry>,
    dimensions: usize,
    built_at: DateTime<Utc>,
}

/// Semantic index over a single document's chunks.
///
/// Two lifecycle states: empty (initial) and populated. `store` replaces the
/// whole state atomically, so a concurrent `search` sees either the old index
/// or the new one, never a half-built mix. A failed `store` leaves the
/// previous state untouched.
pub struct SemanticIndex {
    embedder: Arc<dyn Embedder>,
    chunking: ChunkingConfig,
    state: RwLock<Option<Arc<IndexState>>>,
}

impl SemanticIndex {
    /// Create an empty index using default chunking parameters.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_chunking(embedder, ChunkingConfig::default())
    }

    /// Create an empty index with custom chunking parameters.
    pub fn with_chunking(embedder: Arc<dyn Embedder>, chunking: ChunkingConfig) -> Self {
        Self {
            embedder,
            chunking,
            state: RwLock::new(None),
        }
    }

    /// Whether a store has succeeded.
    pub fn is_populated(&self) -> bool {
        self.state.read().unwrap().is_some()
    }

    /// Number of indexed chunks (0 when empty).
    pub fn chunk_count(&self) -> usize {
        self.snapshot_state().map_or(0, |s| s.entries.len())
    }

    /// Stats for the populated index, if any.
    pub fn stats(&self) -> Option<IndexStats> {
        self.snapshot_state().map(|s| IndexStats {
            chunks: s.entries.len(),
            dimensions: s.dimensions,
            built_at: s.built_at,
        })
    }

    /// Enumerate the current chunk/vector pairs in storage order.
    ///
    /// Returns an empty vector when the index is empty. Intended for external
    /// persistence of the index contents.
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.snapshot_state().map_or_else(Vec::new, |s| s.entries.clone())
    }

    /// Chunk `text`, embed every chunk in one batch, and replace the index.
    ///
    /// Returns the number of chunks indexed. Empty or whitespace-only text is
    /// invalid input. Any failure, including an embedding failure, leaves a
    /// previously populated index intact.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn store(&self, text: &str) -> Result<usize> {
        if text.trim().is_empty() {
            return Err(SvarError::InvalidInput(
                "Cannot index empty or whitespace-only text".to_string(),
            ));
        }

        let chunks = chunk_text(text, &self.chunking)?;
        if chunks.is_empty() {
            return Err(SvarError::InvalidInput(
                "Chunking produced no chunks to embed".to_string(),
            ));
        }

        debug!("Embedding {} chunks", chunks.len());
        let vectors = self.embedder.embed_batch(&chunks).await?;

        let entries = Self::zip_entries(chunks, vectors)?;
        self.commit(entries)
    }

    /// Rebuild the index from pre-computed chunk/vector pairs.
    ///
    /// Lets a persistence collaborator restore an index without re-embedding.
    /// The pairs must be non-empty and share one dimension.
    pub fn rebuild(&self, entries: Vec<IndexEntry>) -> Result<usize> {
        if entries.is_empty() {
            return Err(SvarError::InvalidInput(
                "Cannot rebuild an index from zero entries".to_string(),
            ));
        }
        self.commit(entries)
    }

    /// Retrieve the `top_k` chunks nearest to `query`.
    ///
    /// Never fails for an empty index; that is the `NoIndex` outcome. `top_k`
    /// is clamped to the number of stored chunks, so over-asking returns
    /// everything ranked rather than erroring.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn search(&self, query: &str, top_k: usize) -> Result<SearchOutcome> {
        let Some(state) = self.snapshot_state() else {
            return Ok(SearchOutcome::NoIndex);
        };

        let query_vector = self.embedder.embed(query).await?;
        if query_vector.len() != state.dimensions {
            return Err(SvarError::Embedding(format!(
                "Query embedding dimension {} does not match index dimension {}",
                query_vector.len(),
                state.dimensions
            )));
        }

        let mut scored: Vec<ScoredChunk> = state
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| ScoredChunk {
                position,
                distance: squared_euclidean(&query_vector, &entry.vector),
                text: entry.text.clone(),
            })
            .collect();

        // Stable sort: exact distance ties keep insertion order.
        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k.clamp(1, state.entries.len()));

        debug!(
            "Top distance {:.4} over {} chunks",
            scored.first().map(|c| c.distance).unwrap_or_default(),
            state.entries.len()
        );

        if scored.iter().all(|c| c.text.trim().is_empty()) {
            return Ok(SearchOutcome::NoRelevantMatch);
        }

        Ok(SearchOutcome::Found(scored))
    }

    /// Take a snapshot of the current chunk/vector pairs for persistence.
    pub fn snapshot(&self, model: &str) -> Option<IndexSnapshot> {
        self.snapshot_state().map(|s| IndexSnapshot {
            model: model.to_string(),
            dimensions: s.dimensions,
            created_at: Utc::now(),
            entries: s.entries.clone(),
        })
    }

    fn snapshot_state(&self) -> Option<Arc<IndexState>> {
        self.state.read().unwrap().clone()
    }

    /// Validate vectors against chunks and pair them up.
    fn zip_entries(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Vec<IndexEntry>> {
        if vectors.is_empty() {
            return Err(SvarError::Embedding(
                "Embedding batch returned no vectors".to_string(),
            ));
        }
        if vectors.len() != chunks.len() {
            return Err(SvarError::Embedding(format!(
                "Embedding batch returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        Ok(chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| IndexEntry { text, vector })
            .collect())
    }

    /// Validate dimensions and swap in the new state.
    fn commit(&self, entries: Vec<IndexEntry>) -> Result<usize> {
        let dimensions = entries[0].vector.len();
        if dimensions == 0 {
            return Err(SvarError::Embedding(
                "Embedding vectors have zero dimensions".to_string(),
            ));
        }
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimensions) {
            return Err(SvarError::Embedding(format!(
                "Inconsistent embedding dimensions: expected {}, got {}",
                dimensions,
                bad.vector.len()
            )));
        }

        let count = entries.len();
        let state = Arc::new(IndexState {
            entries,
            dimensions,
            built_at: Utc::now(),
        });
        *self.state.write().unwrap() = Some(state);

        info!("Indexed {} chunks ({} dimensions)", count, dimensions);
        Ok(count)
    }
}

/// Compute squared Euclidean distance between two vectors.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use async_trait::async_trait;

    /// Deterministic bag-of-tokens embedder for tests.
    ///
    /// Hashes each whitespace token into a fixed number of buckets and
    /// normalizes, so identical text always embeds identically and texts
    /// sharing vocabulary land close together.
    struct TokenHashEmbedder {
        dims: usize,
    }

    impl TokenHashEmbedder {
        fn new() -> Self {
            Self { dims: 32 }
        }

        fn encode(&self, text: &str) -> Vec<f32> {
            let mut v = vec![0.0f32; self.dims];
            for token in text.split_whitespace() {
                v[fnv1a(token) as usize % self.dims] += 1.0;
            }
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for x in &mut v {
                    *x /= norm;
                }
            }
            v
        }
    }

    // DefaultHasher is randomized per process, so tests use a fixed hash.
    fn fnv1a(token: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    #[async_trait]
    impl Embedder for TokenHashEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(self.encode(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| self.encode(t)).collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }
    }

    /// Embedder that always fails, for store-failure semantics.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            Err(SvarError::Embedding("model unavailable".to_string()))
        }

        async fn embed_batch(&self, _texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Err(SvarError::Embedding("model unavailable".to_string()))
        }

        fn dimensions(&self) -> usize {
            32
        }
    }

    fn small_chunks() -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: 40,
            overlap: 8,
        }
    }

    fn index() -> SemanticIndex {
        SemanticIndex::with_chunking(Arc::new(TokenHashEmbedder::new()), small_chunks())
    }

    #[test]
    fn test_squared_euclidean() {
        assert_eq!(squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_euclidean(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_before_store_returns_sentinel() {
        let idx = index();
        let outcome = idx.search("anything", 3).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::NoIndex));
        assert_eq!(outcome.context(), NO_EMBEDDINGS_SENTINEL);
    }

    #[tokio::test]
    async fn test_store_rejects_blank_text() {
        let idx = index();
        assert!(matches!(
            idx.store("   \n\t ").await.unwrap_err(),
            SvarError::InvalidInput(_)
        ));
        assert!(!idx.is_populated());
    }

    #[tokio::test]
    async fn test_store_search_round_trip() {
        let idx = index();
        let text = "the mitochondria is the powerhouse of the cell \
                    quarterly revenue grew faster than expected \
                    glaciers in the north are retreating every year";
        idx.store(text).await.unwrap();

        let outcome = idx.search("quarterly revenue grew", 1).await.unwrap();
        let SearchOutcome::Found(chunks) = outcome else {
            panic!("expected ranked chunks");
        };
        assert!(chunks[0].text.contains("revenue"));
    }

    #[tokio::test]
    async fn test_context_joins_chunks_with_separator() {
        let idx = index();
        idx.store("alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu")
            .await
            .unwrap();

        let outcome = idx.search("alpha beta", 2).await.unwrap();
        let context = outcome.context();
        if idx.chunk_count() > 1 {
            assert!(context.contains("\n---\n"));
        }
        assert!(context.contains("alpha"));
    }

    #[tokio::test]
    async fn test_store_replaces_previous_index() {
        let idx = index();
        idx.store("oceans currents tides waves salt water everywhere forever")
            .await
            .unwrap();
        idx.store("compilers parse tokenize optimize emit machine code")
            .await
            .unwrap();

        let outcome = idx.search("oceans tides", 10).await.unwrap();
        let SearchOutcome::Found(chunks) = outcome else {
            panic!("expected ranked chunks");
        };
        for chunk in &chunks {
            assert!(!chunk.text.contains("oceans"));
        }
    }

    #[tokio::test]
    async fn test_top_k_is_clamped_to_chunk_count() {
        let idx = index();
        let text: String = (0..12)
            .map(|i| format!("sentence number {} about topic {} ", i, i))
            .collect();
        idx.store(&text).await.unwrap();
        let stored = idx.chunk_count();
        assert!(stored > 1);

        let outcome = idx.search("sentence number", 1000).await.unwrap();
        let SearchOutcome::Found(chunks) = outcome else {
            panic!("expected ranked chunks");
        };
        assert_eq!(chunks.len(), stored);

        // top_k of zero is treated as one, not an error.
        let outcome = idx.search("sentence number", 0).await.unwrap();
        let SearchOutcome::Found(chunks) = outcome else {
            panic!("expected ranked chunks");
        };
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_store_preserves_previous_state() {
        let good = index();
        good.store("stable content that should survive a failed re-index attempt")
            .await
            .unwrap();
        let before = good.chunk_count();

        // Blank input fails before touching state.
        assert!(good.store("  ").await.is_err());
        assert_eq!(good.chunk_count(), before);
        assert!(good.search("stable content", 1).await.unwrap().has_context());

        // An embedding failure on a fresh index leaves it empty.
        let failing = SemanticIndex::with_chunking(Arc::new(FailingEmbedder), small_chunks());
        assert!(matches!(
            failing.store("some real text").await.unwrap_err(),
            SvarError::Embedding(_)
        ));
        assert!(!failing.is_populated());
        assert!(matches!(
            failing.search("q", 3).await.unwrap(),
            SearchOutcome::NoIndex
        ));
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let idx = index();
        let text = "reliable repeatable retrieval results require careful determinism in tests";
        idx.store(text).await.unwrap();
        let a = idx.search("repeatable retrieval", 3).await.unwrap();
        idx.store(text).await.unwrap();
        let b = idx.search("repeatable retrieval", 3).await.unwrap();

        let (SearchOutcome::Found(a), SearchOutcome::Found(b)) = (a, b) else {
            panic!("expected ranked chunks");
        };
        let ranks_a: Vec<(usize, String)> = a.into_iter().map(|c| (c.position, c.text)).collect();
        let ranks_b: Vec<(usize, String)> = b.into_iter().map(|c| (c.position, c.text)).collect();
        assert_eq!(ranks_a, ranks_b);
    }

    #[tokio::test]
    async fn test_all_blank_results_are_no_relevant_match() {
        let idx = index();
        let blank = vec![0.1f32; 32];
        idx.rebuild(vec![
            IndexEntry {
                text: "   ".to_string(),
                vector: blank.clone(),
            },
            IndexEntry {
                text: "\n\t".to_string(),
                vector: blank,
            },
        ])
        .unwrap();

        let outcome = idx.search("anything at all", 2).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::NoRelevantMatch));
        assert_eq!(outcome.context(), NO_RELEVANT_CONTEXT_SENTINEL);
    }

    #[tokio::test]
    async fn test_rebuild_round_trip() {
        let idx = index();
        idx.store("persist me to disk and bring me back without re-embedding")
            .await
            .unwrap();
        let entries = idx.entries();
        assert_eq!(entries.len(), idx.chunk_count());

        let restored = index();
        restored.rebuild(entries.clone()).unwrap();
        assert_eq!(restored.chunk_count(), entries.len());
        assert!(restored
            .search("bring me back", 1)
            .await
            .unwrap()
            .has_context());
    }

    #[test]
    fn test_rebuild_rejects_bad_entries() {
        let idx = index();
        assert!(matches!(
            idx.rebuild(Vec::new()).unwrap_err(),
            SvarError::InvalidInput(_)
        ));

        let mismatched = vec![
            IndexEntry {
                text: "a".to_string(),
                vector: vec![1.0, 2.0],
            },
            IndexEntry {
                text: "b".to_string(),
                vector: vec![1.0, 2.0, 3.0],
            },
        ];
        assert!(matches!(
            idx.rebuild(mismatched).unwrap_err(),
            SvarError::Embedding(_)
        ));
        assert!(!idx.is_populated());
    }

    #[tokio::test]
    async fn test_stats_and_snapshot() {
        let idx = index();
        assert!(idx.stats().is_none());
        assert!(idx.snapshot("test-model").is_none());

        idx.store("words enough to produce at least one chunk of content")
            .await
            .unwrap();

        let stats = idx.stats().unwrap();
        assert_eq!(stats.chunks, idx.chunk_count());
        assert_eq!(stats.dimensions, 32);

        let snapshot = idx.snapshot("test-model").unwrap();
        assert_eq!(snapshot.model, "test-model");
        assert_eq!(snapshot.dimensions, 32);
        assert_eq!(snapshot.entries.len(), idx.chunk_count());
    }

    #[tokio::test]
    async fn test_snapshot_json_round_trip() {
        let idx = index();
        idx.store("chunks that travel through json and come back intact")
            .await
            .unwrap();

        let json = idx.snapshot("test-model").unwrap().to_json().unwrap();
        let parsed = IndexSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.model, "test-model");
        assert_eq!(parsed.entries.len(), idx.chunk_count());

        let restored = index();
        restored.rebuild(parsed.entries).unwrap();
        assert_eq!(restored.chunk_count(), idx.chunk_count());
    }

    #[test]
    fn test_snapshot_from_malformed_json_is_a_json_error() {
        let err = IndexSnapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, SvarError::Json(_)));
    }
}

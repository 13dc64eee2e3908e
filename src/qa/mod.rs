//! Question answering over the indexed transcript.
//!
//! Retrieves the most relevant chunks for a question and asks an LLM to
//! answer strictly from that context.

use crate::config::QaSettings;
use crate::error::{Result, SvarError};
use crate::index::{SearchOutcome, SemanticIndex};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// System prompt constraining answers to the retrieved context.
const QA_SYSTEM_PROMPT: &str = "You are a helpful assistant. Only answer using the provided \
context. If the answer is not in the context, say 'I don't know.'";

/// Canned answer when nothing has been indexed yet.
const NO_INDEX_ANSWER: &str =
    "No transcript has been indexed yet. Index a transcript before asking questions.";

/// Canned answer when retrieval finds nothing usable.
const NO_MATCH_ANSWER: &str =
    "Nothing in the indexed transcript looks relevant to that question.";

/// QA engine combining retrieval and answer generation.
pub struct QaEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    index: Arc<SemanticIndex>,
    settings: QaSettings,
}

/// An answer with the retrieval outcome that produced it.
#[derive(Debug, Clone)]
pub struct QaResponse {
    /// The generated (or canned) answer.
    pub answer: String,
    /// The retrieval outcome behind the answer.
    pub context: SearchOutcome,
}

impl QaEngine {
    /// Create a new QA engine over an index.
    pub fn new(index: Arc<SemanticIndex>, settings: QaSettings) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            index,
            settings,
        })
    }

    /// Override the answer model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.settings.model = model.to_string();
        self
    }

    /// Ask a question against the indexed transcript.
    ///
    /// "No index yet" and "nothing relevant" come back as distinct canned
    /// answers without an LLM call; only real context is sent to the model.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<QaResponse> {
        info!("Processing question: {}", question);

        let outcome = self.index.search(question, self.settings.top_k).await?;

        let answer = match &outcome {
            SearchOutcome::NoIndex => NO_INDEX_ANSWER.to_string(),
            SearchOutcome::NoRelevantMatch => NO_MATCH_ANSWER.to_string(),
            SearchOutcome::Found(chunks) => {
                debug!("Answering with {} context chunks", chunks.len());
                self.generate(question, &outcome.context()).await?
            }
        };

        Ok(QaResponse {
            answer,
            context: outcome,
        })
    }

    /// Call the LLM with the question and assembled context.
    async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let user_prompt = format!("Context:\n{}\n\nQuestion: {}", context, question);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(QA_SYSTEM_PROMPT)
                .build()
                .map_err(|e| SvarError::Qa(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| SvarError::Qa(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build()
            .map_err(|e| SvarError::Qa(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Qa("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkingConfig;
    use crate::embedding::Embedder;
    use async_trait::async_trait;

    struct ZeroEmbedder;

    #[async_trait]
    impl Embedder for ZeroEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(vec![0.0; 8])
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 8]).collect())
        }

        fn dimensions(&self) -> usize {
            8
        }
    }

    #[tokio::test]
    async fn test_ask_before_indexing_does_not_call_llm() {
        let index = Arc::new(SemanticIndex::new(Arc::new(ZeroEmbedder)));
        let engine = QaEngine::new(index, QaSettings::default()).unwrap();

        // No network involved: the empty-index path short-circuits.
        let response = engine.ask("what is this about?").await.unwrap();
        assert_eq!(response.answer, NO_INDEX_ANSWER);
        assert!(matches!(response.context, SearchOutcome::NoIndex));
    }

    #[tokio::test]
    async fn test_blank_results_map_to_no_match_answer() {
        let index = Arc::new(SemanticIndex::with_chunking(
            Arc::new(ZeroEmbedder),
            ChunkingConfig::default(),
        ));
        index
            .rebuild(vec![crate::index::IndexEntry {
                text: "   ".to_string(),
                vector: vec![0.0; 8],
            }])
            .unwrap();

        let engine = QaEngine::new(index, QaSettings::default()).unwrap();
        let response = engine.ask("anything").await.unwrap();
        assert_eq!(response.answer, NO_MATCH_ANSWER);
        assert!(matches!(response.context, SearchOutcome::NoRelevantMatch));
    }
}

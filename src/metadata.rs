//! LLM-generated metadata for a transcript.
//!
//! Produces structured descriptive metadata (title, summaries, highlights,
//! categorization) from the full transcript text in a single LLM call.

use crate::config::MetadataSettings;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Structured metadata describing a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Compelling, SEO-friendly title (max ~60 characters).
    pub title: String,
    /// One-to-two sentence summary.
    pub short_description: String,
    /// Comprehensive multi-paragraph description.
    pub detailed_description: String,
    #[serde(default)]
    pub key_highlights: Vec<String>,
    #[serde(default)]
    pub main_takeaways: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Overall sentiment (Positive, Negative, Neutral, Mixed).
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub target_audience: String,
    /// Beginner, Intermediate, or Advanced.
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

const METADATA_SYSTEM_PROMPT: &str = "You are an expert content analyst. Provide accurate, \
structured metadata in JSON format. Always respond with valid JSON.";

/// Generates transcript metadata via an LLM.
pub struct MetadataGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: MetadataSettings,
}

impl MetadataGenerator {
    /// Create a new metadata generator.
    pub fn new(settings: MetadataSettings) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            settings,
        })
    }

    /// Generate metadata for a transcript.
    #[instrument(skip(self, transcript), fields(len = transcript.len()))]
    pub async fn generate(&self, transcript: &str) -> Result<MediaMetadata> {
        if transcript.trim().is_empty() {
            return Err(SvarError::InvalidInput(
                "Cannot generate metadata for empty text".to_string(),
            ));
        }

        let user_prompt = build_prompt(transcript);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(METADATA_SYSTEM_PROMPT)
                .build()
                .map_err(|e| SvarError::Metadata(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| SvarError::Metadata(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .max_tokens(self.settings.max_tokens)
            .temperature(0.2)
            .build()
            .map_err(|e| SvarError::Metadata(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Metadata API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Metadata("Empty response from LLM".to_string()))?;

        Ok(parse_metadata(content))
    }
}

/// Build the metadata prompt for a transcript.
fn build_prompt(transcript: &str) -> String {
    format!(
        r#"Based on the following transcript, provide comprehensive metadata in JSON format:

TRANSCRIPT:
{}

Please analyze and provide the following information in a structured JSON format:
{{
    "title": "A compelling, SEO-friendly title (max 60 characters)",
    "short_description": "A concise summary in 1-2 sentences (max 150 characters)",
    "detailed_description": "A comprehensive description of the content (2-3 paragraphs)",
    "key_highlights": ["Highlight 1", "Highlight 2", "Highlight 3"],
    "main_takeaways": ["Takeaway 1", "Takeaway 2", "Takeaway 3"],
    "category": "Primary category (e.g., Technology, Education, Business)",
    "subcategory": "More specific subcategory",
    "topics": ["Topic 1", "Topic 2", "Topic 3"],
    "sentiment": "Overall sentiment (Positive, Negative, Neutral, Mixed)",
    "target_audience": "Who would benefit from this content",
    "difficulty_level": "Beginner, Intermediate, or Advanced",
    "action_items": ["Action item 1", "Action item 2"],
    "related_concepts": ["Related concept 1", "Related concept 2"]
}}

Focus on accuracy and provide actionable insights. If the transcript is unclear or too short, indicate that in the response."#,
        transcript
    )
}

/// Parse the LLM response into metadata, with a degraded fallback when the
/// response is not valid JSON.
fn parse_metadata(content: &str) -> MediaMetadata {
    let json_str = extract_json(content);

    match serde_json::from_str::<MediaMetadata>(json_str) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Metadata response was not valid JSON: {}", e);
            // Truncation is decided and applied in characters, not bytes.
            let short = if content.chars().count() > 150 {
                format!("{}...", truncate_chars(content, 150))
            } else {
                content.to_string()
            };
            MediaMetadata {
                title: "Content Analysis".to_string(),
                short_description: short,
                detailed_description: content.to_string(),
                key_highlights: Vec::new(),
                main_takeaways: vec!["See detailed description".to_string()],
                category: "General".to_string(),
                subcategory: "Analysis".to_string(),
                topics: Vec::new(),
                sentiment: "Neutral".to_string(),
                target_audience: "General".to_string(),
                difficulty_level: "General".to_string(),
                action_items: Vec::new(),
                related_concepts: Vec::new(),
            }
        }
    }
}

/// Extract the JSON payload from a possibly markdown-fenced response.
fn extract_json(content: &str) -> &str {
    if let Some(start) = content.find("```json") {
        let body = &content[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    if let Some(start) = content.find("```") {
        let body = &content[start + 3..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    content.trim()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

//! Shared OpenAI client construction.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Requests that take longer than this are abandoned. Embedding a whole
/// transcript in one store is the slowest call this crate makes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the client used for embeddings and chat completions.
///
/// The API key is read from `OPENAI_API_KEY` by async-openai's default
/// config. The underlying HTTP client carries a request timeout so a stalled
/// API call surfaces as an error instead of hanging a store or search.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

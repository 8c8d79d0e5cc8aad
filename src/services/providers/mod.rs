/// Remote provider abstractions
///
/// This module provides a pluggable architecture for the external services the
/// discovery pipeline depends on: a video search backend (YouTube Data API), a
/// highlight generator, and chat completion models (OpenAI, with Gemini as the
/// fallback). Base URLs are injected so tests can point clients at a local
/// mock server.
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::SearchPage,
};

pub mod gemini;
pub mod openai;
pub mod youtube;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use youtube::YouTubeProvider;

/// Inputs for highlight generation, taken from a search candidate
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub channel: String,
}

/// Trait for video search backends
///
/// One call resolves a full page of candidates with duration and view counts
/// already formatted for display. `page_token` continues a previous page.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoSearchProvider: Send + Sync {
    /// Search for videos matching the query
    async fn search<'a>(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&'a str>,
    ) -> AppResult<SearchPage>;
}

/// Trait for highlight bullet generation
///
/// Returns the raw highlight lines; callers are responsible for enforcing the
/// exactly-3 invariant (see `services::enrich`). Any error here is recovered
/// with the static fallback triple, never surfaced to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HighlightGenerator: Send + Sync {
    /// Generate highlight bullets for one candidate
    async fn generate(&self, request: &HighlightRequest) -> AppResult<Vec<String>>;
}

/// Trait for chat completion models
///
/// The chat service walks an ordered list of these, falling back to the next
/// on any error, so implementations should fail fast on missing credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Model name for logging
    fn name(&self) -> &'static str;

    /// Run one completion with a system prompt and a single user message
    async fn complete(&self, system_prompt: &str, message: &str) -> AppResult<String>;
}

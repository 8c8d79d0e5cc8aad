/// OpenAI provider
///
/// Backs both highlight generation and the primary chat model via the
/// chat-completions endpoint. Construction never fails: a missing API key
/// surfaces as a `Config` error at call time so the fallback chains
/// (static highlight triple, Gemini, keyword heuristic) can take over.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::{ChatModel, HighlightGenerator, HighlightRequest},
};

const HIGHLIGHTS_MODEL: &str = "gpt-4o-mini";

const HIGHLIGHTS_SYSTEM_PROMPT: &str =
    "You are an expert at creating compelling video highlights that drive engagement.";

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI client; `api_key` may be absent
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("OpenAI API key not configured".to_string()))
    }

    /// Run one chat completion and return the assistant message text
    async fn chat_completion(
        &self,
        system_prompt: &str,
        message: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> AppResult<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({
                "model": HIGHLIGHTS_MODEL,
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": message }
                ],
                "max_tokens": max_tokens,
                "temperature": temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(AppError::ExternalApi(format!(
                "OpenAI API returned status {}: {}",
                status, message
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| AppError::ExternalApi("OpenAI response had no choices".to_string()))
    }
}

/// Builds the highlight prompt for one candidate
fn highlight_prompt(request: &HighlightRequest) -> String {
    format!(
        "You are an AI that creates engaging bullet-point highlights for videos. \
Based on the video title, description, and channel name, create exactly 3 compelling \
bullet points that would make someone want to watch this video.\n\n\
Video Title: {}\n\
Channel: {}\n\
Description: {}\n\n\
Requirements:\n\
- Exactly 3 bullet points\n\
- Each point should be 8-15 words\n\
- Focus on key insights, benefits, or interesting facts\n\
- Make them compelling and curiosity-inducing\n\
- Avoid generic statements\n\
- Format as a simple list without bullet symbols",
        request.title,
        request.channel,
        request
            .description
            .as_deref()
            .unwrap_or("No description available"),
    )
}

#[async_trait::async_trait]
impl HighlightGenerator for OpenAiClient {
    async fn generate(&self, request: &HighlightRequest) -> AppResult<Vec<String>> {
        let prompt = highlight_prompt(request);
        let text = self
            .chat_completion(HIGHLIGHTS_SYSTEM_PROMPT, &prompt, 200, 0.7)
            .await?;

        let highlights: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(
            title = %request.title,
            highlights = highlights.len(),
            provider = "openai",
            "Highlights generated"
        );

        Ok(highlights)
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, system_prompt: &str, message: &str) -> AppResult<String> {
        self.chat_completion(system_prompt, message, 300, 0.8).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_prompt_includes_fields() {
        let request = HighlightRequest {
            title: "Rust in 10 minutes".to_string(),
            description: Some("A whirlwind tour".to_string()),
            channel: "RustTube".to_string(),
        };
        let prompt = highlight_prompt(&request);
        assert!(prompt.contains("Video Title: Rust in 10 minutes"));
        assert!(prompt.contains("Channel: RustTube"));
        assert!(prompt.contains("Description: A whirlwind tour"));
    }

    #[test]
    fn test_highlight_prompt_missing_description() {
        let request = HighlightRequest {
            title: "t".to_string(),
            description: None,
            channel: "c".to_string(),
        };
        let prompt = highlight_prompt(&request);
        assert!(prompt.contains("Description: No description available"));
    }

    #[test]
    fn test_completion_response_deserialization() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "line one\nline two"}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "line one\nline two");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let client = OpenAiClient::new(None, "http://test.local".to_string());
        let request = HighlightRequest {
            title: "t".to_string(),
            description: None,
            channel: "c".to_string(),
        };
        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

/// Gemini provider
///
/// Secondary chat model used when OpenAI is unavailable or failing. Only the
/// chat seam is implemented; highlights stay on the OpenAI/fallback path.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::ChatModel,
};

const CHAT_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini client; `api_key` may be absent
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, system_prompt: &str, message: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Gemini API key not configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, CHAT_MODEL
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": message }] }
                ],
                "systemInstruction": {
                    "role": "user",
                    "parts": [{ "text": system_prompt }]
                },
                "generationConfig": { "temperature": 0.8, "maxOutputTokens": 300 },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateContentResponse = response.json().await?;
        generated
            .reply_text()
            .ok_or_else(|| AppError::ExternalApi("Gemini response had no candidates".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Joins all text parts of the first candidate
    fn reply_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.parts;
        let text = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

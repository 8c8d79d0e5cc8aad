/// Chat assistant
///
/// Walks a fallback chain so the caller never sees a hard failure: the
/// primary model (OpenAI), then the secondary (Gemini), then a locally
/// computed keyword heuristic paired with an apology reply.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{models::Preferences, services::providers::ChatModel};

/// Words ignored by the keyword heuristic
const STOP_WORDS: [&str; 19] = [
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
    "had", "how", "video", "find", "show", "watch",
];

/// Assistant reply returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub suggested_search_terms: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatService {
    /// Models tried in order; the first success wins
    models: Vec<Arc<dyn ChatModel>>,
}

impl ChatService {
    pub fn new(models: Vec<Arc<dyn ChatModel>>) -> Self {
        Self { models }
    }

    /// Produce a reply for one chat message
    ///
    /// Always returns a reply. Provider failures are logged and recovered.
    pub async fn respond(&self, message: &str, preferences: Option<&Preferences>) -> ChatReply {
        let system = system_prompt(preferences);

        for model in &self.models {
            match model.complete(&system, message).await {
                Ok(reply) => {
                    let suggested_search_terms = if is_video_request(message) {
                        extract_search_terms(message, preferences)
                    } else {
                        None
                    };
                    tracing::info!(model = model.name(), "Chat reply generated");
                    return ChatReply {
                        reply,
                        suggested_search_terms,
                        timestamp: Utc::now(),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        model = model.name(),
                        error = %e,
                        "Chat model failed; trying next"
                    );
                }
            }
        }

        // Heuristic fallback: still respond helpfully without failing.
        let suggested_search_terms = extract_search_terms(message, preferences);
        let reply = match &suggested_search_terms {
            Some(terms) => format!(
                "I'm having a small hiccup connecting right now. Try searching: \"{}\".",
                terms
            ),
            None => "I'm having a small hiccup connecting right now. Tell me what you want \
                     to watch and I'll suggest searches."
                .to_string(),
        };

        ChatReply {
            reply,
            suggested_search_terms,
            timestamp: Utc::now(),
        }
    }
}

/// Whether the message looks like a request for specific videos
pub fn is_video_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["video", "watch", "find", "show"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Keyword extraction used when no model is available
///
/// Strips punctuation, drops stop-words and words of 2 characters or fewer,
/// keeps the first 3 keywords and appends the first preferred category.
pub fn extract_search_terms(message: &str, preferences: Option<&Preferences>) -> Option<String> {
    let cleaned: String = message
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let keywords: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| word.len() > 2)
        .filter(|word| !STOP_WORDS.contains(word))
        .collect();

    if keywords.is_empty() {
        return None;
    }

    let mut terms = keywords[..keywords.len().min(3)].join(" ");
    if let Some(category) = preferences.and_then(|p| p.categories.first()) {
        terms.push(' ');
        terms.push_str(category);
    }

    Some(terms)
}

/// System prompt with the user's preference snapshot interpolated
fn system_prompt(preferences: Option<&Preferences>) -> String {
    let categories = preferences
        .filter(|p| !p.categories.is_empty())
        .map(|p| p.categories.join(", "))
        .unwrap_or_else(|| "Not specified".to_string());
    let custom_topics = preferences
        .map(|p| p.custom_topics.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or("None");
    let lengths = preferences
        .filter(|p| !p.video_lengths.is_empty())
        .map(|p| {
            p.video_lengths
                .iter()
                .map(|l| l.search_phrase())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "Any".to_string());
    let languages = preferences
        .filter(|p| !p.languages.is_empty())
        .map(|p| p.languages.join(", "))
        .unwrap_or_else(|| "Any".to_string());
    let mood = preferences
        .and_then(|p| p.mood.as_deref())
        .filter(|m| !m.is_empty())
        .unwrap_or("Not specified");

    format!(
        "You are YouBuddy, an AI assistant for YouSwipe, a video discovery app. Your job \
is to help users find videos based on their requests.\n\n\
User's Preferences:\n\
- Interested categories: {categories}\n\
- Custom topics: {custom_topics}\n\
- Preferred video lengths: {lengths}\n\
- Languages: {languages}\n\
- Current mood: {mood}\n\n\
Guidelines:\n\
1. When users ask for video recommendations, suggest specific search terms that would \
find relevant content\n\
2. Be conversational, friendly, and enthusiastic about video discovery\n\
3. Consider their preferences when making suggestions\n\
4. If they ask vague questions, ask clarifying questions to better understand their needs\n\
5. Keep responses concise but helpful\n\
6. Always focus on helping them find great content\n\n\
Respond in a helpful, enthusiastic way that makes video discovery fun!"
    )
}

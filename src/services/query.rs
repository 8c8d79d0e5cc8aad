/// Search query construction
///
/// Turns a preference snapshot into a search string and appends one randomly
/// chosen freshness token per call so repeated searches surface varied
/// results. The token draw is uniform and deliberately unseeded; there is no
/// reproducibility guarantee across calls.
use rand::seq::SliceRandom;

use crate::models::Preferences;

/// Vocabulary of freshness tokens appended to diversify results
pub const FRESHNESS_TOKENS: [&str; 19] = [
    "latest",
    "best",
    "top",
    "new",
    "trending",
    "popular",
    "viral",
    "amazing",
    "awesome",
    "must watch",
    "2024",
    "2023",
    "recent",
    "tutorial",
    "guide",
    "tips",
    "review",
    "explained",
    "how to",
];

/// Query used when the preferences produce nothing to search for
const DEFAULT_QUERY: &str = "trending";

/// Base query derived from preferences, without the freshness token
///
/// Concatenates, in fixed order: categories, custom topics, mood, the length
/// bucket phrase, languages. Falls back to `"trending"` when all are empty.
pub fn base_query(preferences: &Preferences) -> String {
    let mut terms: Vec<&str> = Vec::new();

    for category in &preferences.categories {
        terms.push(category);
    }
    if !preferences.custom_topics.trim().is_empty() {
        terms.push(preferences.custom_topics.trim());
    }
    if let Some(mood) = preferences.mood.as_deref() {
        if !mood.trim().is_empty() {
            terms.push(mood.trim());
        }
    }
    // The UI constrains length selection to at most one bucket.
    if let Some(length) = preferences.video_lengths.first() {
        terms.push(length.search_phrase());
    }
    for language in &preferences.languages {
        terms.push(language);
    }

    let query = terms.join(" ").trim().to_string();
    if query.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        query
    }
}

/// Full query for one search call: base (or explicit override, used for
/// pagination refills) plus exactly one freshness token
pub fn build(preferences: &Preferences, base_override: Option<&str>) -> String {
    let base = match base_override {
        Some(base) => base.to_string(),
        None => base_query(preferences),
    };
    let token = FRESHNESS_TOKENS
        .choose(&mut rand::thread_rng())
        .expect("token vocabulary is non-empty");
    format!("{} {}", base, token)
}

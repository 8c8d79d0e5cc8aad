use serde::{Deserialize, Serialize};

/// Snapshot of the user's onboarding choices
///
/// Created once when onboarding completes and immutable for the lifetime of a
/// swipe session. Field names follow the client wire shape (camelCase).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Content categories the user selected (e.g., "Gaming", "Music")
    pub categories: Vec<String>,
    /// Free-text topics entered by the user
    pub custom_topics: String,
    /// Preferred video length buckets
    pub video_lengths: Vec<VideoLength>,
    /// Languages the user understands
    pub languages: Vec<String>,
    /// Current mood, if the user set one
    pub mood: Option<String>,
}

/// Video length bucket selectable during onboarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoLength {
    Shorts,
    Short,
    Medium,
    Long,
}

impl VideoLength {
    /// Search phrase injected into the built query for this bucket
    pub fn search_phrase(self) -> &'static str {
        match self {
            VideoLength::Shorts => "shorts",
            VideoLength::Short => "short video 3-5 minutes",
            VideoLength::Medium => "10+ minutes video",
            VideoLength::Long => "30+ minutes long video",
        }
    }
}

use serde::{Deserialize, Serialize};

/// Placeholder shown when the details lookup could not resolve a value
pub const UNKNOWN_FIELD: &str = "-";

/// A video record returned by the search step, pre-enrichment
///
/// Produced by the search provider and never mutated afterwards except to
/// attach highlights (see [`EnrichedVideo`]). `duration` and `views` are
/// already human-formatted (`m:ss` / `h:mm:ss`, `1.2M`) or the `"-"`
/// placeholder when the details lookup was unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    /// Provider-assigned video id, unique within a session
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub duration: String,
    pub views: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A candidate with its highlight bullets attached
///
/// Invariant: `highlights` always holds exactly 3 entries, either generated,
/// truncated/padded to 3, or the static fallback triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedVideo {
    #[serde(flatten)]
    pub video: VideoCandidate,
    pub highlights: Vec<String>,
}

/// One page of search results plus the provider's continuation token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub videos: Vec<VideoCandidate>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> VideoCandidate {
        VideoCandidate {
            id: id.to_string(),
            title: "Test video".to_string(),
            channel: "Test channel".to_string(),
            thumbnail: "https://example.com/t.jpg".to_string(),
            duration: "5:07".to_string(),
            views: "1.2M".to_string(),
            published_at: Some("2024-01-01T00:00:00Z".to_string()),
            description: Some("A description".to_string()),
        }
    }

    #[test]
    fn test_candidate_wire_shape_is_camel_case() {
        let json = serde_json::to_value(candidate("abc")).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["publishedAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("published_at").is_none());
    }

    #[test]
    fn test_enriched_video_flattens_candidate() {
        let enriched = EnrichedVideo {
            video: candidate("abc"),
            highlights: vec!["one".into(), "two".into(), "three".into()],
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["title"], "Test video");
        assert_eq!(json["highlights"][2], "three");

        let back: EnrichedVideo = serde_json::from_value(json).unwrap();
        assert_eq!(back, enriched);
    }

    #[test]
    fn test_candidate_optional_fields_default() {
        let json = r#"{
            "id": "x",
            "title": "t",
            "channel": "c",
            "thumbnail": "u",
            "duration": "-",
            "views": "-"
        }"#;
        let parsed: VideoCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.published_at, None);
        assert_eq!(parsed.description, None);
    }
}

/// Highlight enrichment
///
/// Attaches exactly 3 highlight bullets to each candidate. A batch is issued
/// as one task per candidate and joined; a failing member falls back to the
/// static triple and never aborts its siblings.
use std::sync::Arc;

use crate::{
    models::{EnrichedVideo, VideoCandidate},
    services::providers::{HighlightGenerator, HighlightRequest},
};

/// Static highlight triple used whenever generation fails or comes up short
pub const FALLBACK_HIGHLIGHTS: [&str; 3] = [
    "Discover key insights from industry experts",
    "Learn practical tips you can apply immediately",
    "Get behind-the-scenes knowledge and strategies",
];

/// The fallback triple as owned strings
pub fn fallback_highlights() -> Vec<String> {
    FALLBACK_HIGHLIGHTS.iter().map(|s| s.to_string()).collect()
}

/// Enforce the exactly-3 invariant on generated highlight lines
///
/// Blank lines are dropped, surplus lines truncated, and short results padded
/// from the fallback triple so downstream code can rely on the length.
pub fn normalize_highlights(lines: Vec<String>) -> Vec<String> {
    let mut highlights: Vec<String> = lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    highlights.truncate(3);
    while highlights.len() < 3 {
        highlights.push(FALLBACK_HIGHLIGHTS[highlights.len()].to_string());
    }
    highlights
}

/// Enrich one candidate, falling back on any generation failure
pub async fn enrich_one(
    generator: Arc<dyn HighlightGenerator>,
    candidate: VideoCandidate,
) -> EnrichedVideo {
    let request = HighlightRequest {
        title: candidate.title.clone(),
        description: candidate.description.clone(),
        channel: candidate.channel.clone(),
    };

    let highlights = match generator.generate(&request).await {
        Ok(lines) => normalize_highlights(lines),
        Err(e) => {
            tracing::warn!(
                error = %e,
                title = %candidate.title,
                "Highlight generation failed; using fallback"
            );
            fallback_highlights()
        }
    };

    EnrichedVideo {
        video: candidate,
        highlights,
    }
}

/// Enrich a batch of candidates concurrently
///
/// One task per candidate, joined in submission order so the output keeps the
/// input order. No fan-out limit: the batch completes when every member has
/// resolved or fallen back.
pub async fn enrich_batch(
    generator: Arc<dyn HighlightGenerator>,
    candidates: Vec<VideoCandidate>,
) -> Vec<EnrichedVideo> {
    let mut tasks = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let generator = Arc::clone(&generator);
        tasks.push(tokio::spawn(enrich_one(generator, candidate)));
    }

    let mut enriched = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(video) => enriched.push(video),
            Err(e) => {
                tracing::error!(error = %e, "Enrichment task join error");
            }
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::providers::MockHighlightGenerator,
    };

    fn candidate(id: &str) -> VideoCandidate {
        VideoCandidate {
            id: id.to_string(),
            title: format!("video {}", id),
            channel: "channel".to_string(),
            thumbnail: String::new(),
            duration: "1:00".to_string(),
            views: "10".to_string(),
            published_at: None,
            description: Some("desc".to_string()),
        }
    }

    #[test]
    fn test_normalize_keeps_three_lines() {
        let lines = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        assert_eq!(normalize_highlights(lines.clone()), lines);
    }

    #[test]
    fn test_normalize_truncates_surplus() {
        let lines = vec![
            "one".to_string(),
            "two".to_string(),
            "three".to_string(),
            "four".to_string(),
        ];
        assert_eq!(normalize_highlights(lines), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_normalize_pads_short_results() {
        let lines = vec!["only one".to_string()];
        let normalized = normalize_highlights(lines);
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0], "only one");
        assert_eq!(normalized[1], FALLBACK_HIGHLIGHTS[1]);
        assert_eq!(normalized[2], FALLBACK_HIGHLIGHTS[2]);
    }

    #[test]
    fn test_normalize_drops_blank_lines() {
        let lines = vec![
            "  one  ".to_string(),
            "".to_string(),
            "  ".to_string(),
            "two".to_string(),
            "three".to_string(),
        ];
        assert_eq!(normalize_highlights(lines), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_enrich_one_falls_back_on_error() {
        // Scenario: the highlight call fails, enrich never does.
        let mut generator = MockHighlightGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(AppError::ExternalApi("provider down".to_string())));

        let enriched = enrich_one(Arc::new(generator), candidate("a")).await;
        assert_eq!(enriched.highlights, fallback_highlights());
        assert_eq!(enriched.video.id, "a");
    }

    #[tokio::test]
    async fn test_enrich_batch_isolates_failures() {
        let mut generator = MockHighlightGenerator::new();
        generator.expect_generate().returning(|request| {
            if request.title.contains("bad") {
                Err(AppError::ExternalApi("boom".to_string()))
            } else {
                Ok(vec![
                    "a".to_string(),
                    "b".to_string(),
                    "c".to_string(),
                ])
            }
        });

        let enriched = enrich_batch(
            Arc::new(generator),
            vec![candidate("good"), candidate("bad"), candidate("fine")],
        )
        .await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].highlights, vec!["a", "b", "c"]);
        assert_eq!(enriched[1].highlights, fallback_highlights());
        assert_eq!(enriched[2].highlights, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_enrich_batch_preserves_order() {
        let mut generator = MockHighlightGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(vec!["x".to_string(), "y".to_string(), "z".to_string()]));

        let enriched = enrich_batch(
            Arc::new(generator),
            vec![candidate("1"), candidate("2"), candidate("3")],
        )
        .await;
        let ids: Vec<&str> = enriched.iter().map(|v| v.video.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}

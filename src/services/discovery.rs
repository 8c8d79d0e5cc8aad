/// Discovery pipeline
///
/// One fetch-enrich cycle: search → dedup against the session's seen ids →
/// concurrent highlight enrichment. The session queue consumes the output.
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{EnrichedVideo, SearchPage},
    services::{
        dedup, enrich,
        providers::{HighlightGenerator, HighlightRequest, VideoSearchProvider},
    },
};

pub struct DiscoveryService {
    search: Arc<dyn VideoSearchProvider>,
    highlights: Arc<dyn HighlightGenerator>,
}

/// Result of one fetch-enrich cycle
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPage {
    pub videos: Vec<EnrichedVideo>,
    pub next_page_token: Option<String>,
}

impl DiscoveryService {
    pub fn new(
        search: Arc<dyn VideoSearchProvider>,
        highlights: Arc<dyn HighlightGenerator>,
    ) -> Self {
        Self { search, highlights }
    }

    /// Raw video search, used directly by the search endpoint
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> AppResult<SearchPage> {
        self.search.search(query, max_results, page_token).await
    }

    /// Highlight generation for one candidate, normalized to exactly 3 lines
    pub async fn generate_highlights(&self, request: &HighlightRequest) -> AppResult<Vec<String>> {
        let lines = self.highlights.generate(request).await?;
        Ok(enrich::normalize_highlights(lines))
    }

    /// Run one full cycle: search, drop already-seen candidates, enrich
    pub async fn fetch_enriched_page(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
        seen_ids: &HashSet<String>,
    ) -> AppResult<EnrichedPage> {
        let page = self.search_videos(query, max_results, page_token).await?;
        let fresh = dedup::filter_unseen(page.videos, seen_ids);
        let videos = enrich::enrich_batch(Arc::clone(&self.highlights), fresh).await;

        Ok(EnrichedPage {
            videos,
            next_page_token: page.next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::VideoCandidate,
        services::providers::{MockHighlightGenerator, MockVideoSearchProvider},
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
            description: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_enriched_page_dedups_and_enriches() {
        let mut search = MockVideoSearchProvider::new();
        search.expect_search().returning(|_, _, _| {
            Ok(SearchPage {
                videos: vec![candidate("a"), candidate("b"), candidate("c")],
                next_page_token: Some("tok".to_string()),
            })
        });

        let mut highlights = MockHighlightGenerator::new();
        highlights
            .expect_generate()
            .times(2)
            .returning(|_| Ok(vec!["1".to_string(), "2".to_string(), "3".to_string()]));

        let service = DiscoveryService::new(Arc::new(search), Arc::new(highlights));
        let seen: HashSet<String> = ["b".to_string()].into_iter().collect();

        let page = service
            .fetch_enriched_page("query", 10, None, &seen)
            .await
            .unwrap();

        let ids: Vec<&str> = page.videos.iter().map(|v| v.video.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(page.next_page_token.as_deref(), Some("tok"));
        assert!(page.videos.iter().all(|v| v.highlights.len() == 3));
    }

    #[tokio::test]
    async fn test_search_errors_propagate() {
        let mut search = MockVideoSearchProvider::new();
        search.expect_search().returning(|_, _, _| {
            Err(crate::error::AppError::ExternalApi("quota".to_string()))
        });

        let service = DiscoveryService::new(
            Arc::new(search),
            Arc::new(MockHighlightGenerator::new()),
        );
        let result = service
            .fetch_enriched_page("query", 10, None, &HashSet::new())
            .await;
        assert!(result.is_err());
    }
}

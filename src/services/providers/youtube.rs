/// YouTube Data API v3 provider
///
/// Resolving one page of candidates takes two calls:
/// 1. Search: /search?part=snippet → ids, titles, channels, thumbnails
/// 2. Details: /videos?part=statistics,contentDetails → duration, view count
///
/// Durations arrive as ISO-8601 (`PT1H2M3S`) and are reformatted to
/// `h:mm:ss` / `m:ss`; view counts are abbreviated (`1.2M`, `3.4K`). If the
/// details call fails the page is still served with `"-"` placeholders rather
/// than dropped, so a degraded provider never empties the queue.
use std::collections::HashMap;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{video::UNKNOWN_FIELD, SearchPage, VideoCandidate},
    services::providers::VideoSearchProvider,
};

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl YouTubeProvider {
    /// Creates a new YouTube provider
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Fetch duration and view count for a batch of video ids
    ///
    /// Returns formatted (duration, views) keyed by video id. Matching by id
    /// rather than by position keeps the mapping correct when the details
    /// endpoint drops or reorders entries.
    async fn fetch_details(&self, ids: &[String]) -> AppResult<HashMap<String, (String, String)>> {
        let url = format!("{}/videos", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "statistics,contentDetails"),
                ("id", &ids.join(",")),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let details: VideoListResponse = response.json().await?;

        let mut by_id = HashMap::new();
        for item in details.items {
            let duration = item
                .content_details
                .map(|d| format_duration(&d.duration))
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
            let views = item
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse::<u64>().ok())
                .map(format_views)
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
            by_id.insert(item.id, (duration, views));
        }

        Ok(by_id)
    }
}

#[async_trait::async_trait]
impl VideoSearchProvider for YouTubeProvider {
    async fn search<'a>(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&'a str>,
    ) -> AppResult<SearchPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search", self.api_url);
        let max_results = max_results.to_string();

        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("order", "relevance"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self.http_client.get(&url).query(&params).send().await?;
        let response = ensure_success(response).await?;
        let search: SearchListResponse = response.json().await?;

        // Channel and playlist results carry no videoId and are skipped.
        let items: Vec<(String, Snippet)> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
            .collect();

        let ids: Vec<String> = items.iter().map(|(id, _)| id.clone()).collect();

        let details = if ids.is_empty() {
            HashMap::new()
        } else {
            match self.fetch_details(&ids).await {
                Ok(details) => details,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        videos = ids.len(),
                        "Details lookup failed; serving placeholders"
                    );
                    HashMap::new()
                }
            }
        };

        let videos: Vec<VideoCandidate> = items
            .into_iter()
            .map(|(id, snippet)| {
                let (duration, views) = details
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| (UNKNOWN_FIELD.to_string(), UNKNOWN_FIELD.to_string()));
                VideoCandidate {
                    id,
                    title: snippet.title,
                    channel: snippet.channel_title,
                    thumbnail: snippet.thumbnails.best_url().unwrap_or_default(),
                    duration,
                    views,
                    published_at: snippet.published_at,
                    description: snippet.description,
                }
            })
            .collect();

        tracing::info!(
            query = %query,
            results = videos.len(),
            provider = "youtube",
            "Video search completed"
        );

        Ok(SearchPage {
            videos,
            next_page_token: search.next_page_token,
        })
    }
}

/// Returns the response if successful, otherwise an ExternalApi error with the
/// provider's own error message when one can be extracted from the body
async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);

    Err(AppError::ExternalApi(format!(
        "YouTube API returned status {}: {}",
        status, message
    )))
}

/// Reformat an ISO-8601 duration (`PT1H2M3S`) as `h:mm:ss` / `m:ss`
fn format_duration(iso: &str) -> String {
    let mut hours = 0u64;
    let mut minutes = 0u64;
    let mut seconds = 0u64;

    // Only the time section matters; `P0D` (live streams) has none.
    if let Some(time) = iso.split('T').nth(1) {
        let mut value = 0u64;
        for c in time.chars() {
            match c {
                '0'..='9' => value = value * 10 + (c as u64 - '0' as u64),
                'H' => {
                    hours = value;
                    value = 0;
                }
                'M' => {
                    minutes = value;
                    value = 0;
                }
                'S' => {
                    seconds = value;
                    value = 0;
                }
                _ => value = 0,
            }
        }
    }

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Abbreviate a view count for display (`1.2M`, `3.4K`, `999`)
fn format_views(count: u64) -> String {
    if count > 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count > 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

// ============================================================================
// YouTube Data API wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
}

impl Thumbnails {
    /// Highest-quality thumbnail available
    fn best_url(self) -> Option<String> {
        self.high.or(self.medium).map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_with_hours() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("PT2H5S"), "2:00:05");
    }

    #[test]
    fn test_format_duration_minutes_only() {
        assert_eq!(format_duration("PT5M7S"), "5:07");
        assert_eq!(format_duration("PT12M"), "12:00");
    }

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn test_format_duration_live_stream() {
        // Live streams report P0D with no time section
        assert_eq!(format_duration("P0D"), "0:00");
    }

    #[test]
    fn test_format_views_millions() {
        assert_eq!(format_views(1_500_000), "1.5M");
        assert_eq!(format_views(12_345_678), "12.3M");
    }

    #[test]
    fn test_format_views_thousands() {
        assert_eq!(format_views(2_500), "2.5K");
    }

    #[test]
    fn test_format_views_small() {
        assert_eq!(format_views(999), "999");
        assert_eq!(format_views(0), "0");
    }

    #[test]
    fn test_search_item_deserialization() {
        let json = r#"{
            "id": {"kind": "youtube#video", "videoId": "abc123"},
            "snippet": {
                "title": "A video",
                "channelTitle": "A channel",
                "description": "About things",
                "publishedAt": "2024-02-01T10:00:00Z",
                "thumbnails": {
                    "medium": {"url": "https://img/m.jpg"},
                    "high": {"url": "https://img/h.jpg"}
                }
            }
        }"#;

        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.video_id.as_deref(), Some("abc123"));
        assert_eq!(item.snippet.title, "A video");
        assert_eq!(item.snippet.channel_title, "A channel");
        assert_eq!(
            item.snippet.thumbnails.best_url().as_deref(),
            Some("https://img/h.jpg")
        );
    }

    #[test]
    fn test_thumbnails_fall_back_to_medium() {
        let thumbs = Thumbnails {
            high: None,
            medium: Some(Thumbnail {
                url: "https://img/m.jpg".to_string(),
            }),
        };
        assert_eq!(thumbs.best_url().as_deref(), Some("https://img/m.jpg"));

        assert_eq!(Thumbnails::default().best_url(), None);
    }

    #[test]
    fn test_channel_results_have_no_video_id() {
        let json = r#"{
            "id": {"kind": "youtube#channel", "channelId": "UC123"},
            "snippet": {"title": "c", "channelTitle": "c"}
        }"#;
        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.video_id, None);
    }
}

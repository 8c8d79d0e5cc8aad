use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedVideo, Preferences, VideoCandidate},
    services::{chat::ChatReply, enrich, providers::HighlightRequest, query},
    session::{FetchTicket, QueueState, SwipeDirection, SwipeSession},
};

use super::AppState;

/// Page size for session fetch-enrich cycles
const SESSION_PAGE_SIZE: u32 = 50;

/// User-visible notice when the search path fails
const SEARCH_FAILED_NOTICE: &str = "Could not fetch videos. Please try again.";

/// User-visible notice when the first page comes back empty
const NO_VIDEOS_NOTICE: &str = "No videos found. Try changing your preferences or search terms.";

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub page_token: Option<String>,
}

fn default_max_results() -> u32 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub videos: Vec<VideoCandidate>,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub highlights: Vec<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: QueueState,
    pub remaining: usize,
    pub current: Option<EnrichedVideo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SessionView {
    fn of(session: &SwipeSession, notice: Option<String>) -> Self {
        Self {
            session_id: session.id,
            state: session.queue.state(),
            remaining: session.queue.remaining(),
            current: session.queue.current().cloned(),
            notice,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Video search endpoint
///
/// Provider failures return a non-200 status with `{error, videos: []}` so
/// clients always find a `videos` array to iterate.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    let query = augment_query(&request.query, request.preferences.as_ref());

    match state
        .discovery
        .search_videos(&query, request.max_results, request.page_token.as_deref())
        .await
    {
        Ok(page) => Json(SearchResponse {
            videos: page.videos,
            query,
            next_page_token: page.next_page_token,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Search request failed");
            let status = match e {
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppError::HttpClient(_) | AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = Json(json!({ "error": e.to_string(), "videos": [] }));
            (status, body).into_response()
        }
    }
}

/// Extends the raw query with preference terms, mirroring the search contract
fn augment_query(query: &str, preferences: Option<&Preferences>) -> String {
    let mut query = query.to_string();
    if let Some(prefs) = preferences {
        if !prefs.categories.is_empty() {
            query.push(' ');
            query.push_str(&prefs.categories.join(" OR "));
        }
        if !prefs.custom_topics.trim().is_empty() {
            query.push(' ');
            query.push_str(prefs.custom_topics.trim());
        }
    }
    query
}

/// Highlight generation endpoint
///
/// Always answers 200: failures are swallowed into the fallback triple with
/// the error carried alongside, so callers never special-case a hard failure.
pub async fn highlights(
    State(state): State<AppState>,
    Json(request): Json<HighlightRequest>,
) -> Json<HighlightResponse> {
    let title = request.title.clone();
    match state.discovery.generate_highlights(&request).await {
        Ok(highlights) => Json(HighlightResponse {
            highlights,
            title,
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, title = %title, "Highlight generation failed");
            Json(HighlightResponse {
                highlights: enrich::fallback_highlights(),
                title,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Chat assistant endpoint; never fails hard
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    let reply = state
        .chat
        .respond(&request.message, request.preferences.as_ref())
        .await;
    Json(reply)
}

/// Create a swipe session and run the initial fetch-enrich cycle
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<SessionView>) {
    let mut session = SwipeSession::new(request.preferences);
    let fetch_query = query::build(&session.preferences, None);

    let mut notice = None;
    if let Some(ticket) = session.queue.begin_fetch() {
        match state
            .discovery
            .fetch_enriched_page(&fetch_query, SESSION_PAGE_SIZE, None, &HashSet::new())
            .await
        {
            Ok(page) => {
                session
                    .queue
                    .complete_fetch(ticket, page.videos, page.next_page_token, false);
                if session.queue.remaining() == 0 {
                    notice = Some(NO_VIDEOS_NOTICE.to_string());
                }
            }
            Err(e) => {
                tracing::error!(error = %e, session = %session.id, "Initial fetch failed");
                session.queue.abort_fetch(ticket);
                notice = Some(SEARCH_FAILED_NOTICE.to_string());
            }
        }
    }

    let view = SessionView::of(&session, notice);
    state.sessions.write().await.insert(session.id, session);
    (StatusCode::CREATED, Json(view))
}

/// Current item under the session cursor
pub async fn current_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
    Ok(Json(SessionView::of(session, None)))
}

/// Record a swipe decision and advance the queue
///
/// A right swipe saves the current video to the like store before advancing.
/// When the queue runs low a refill cycle is spawned in the background,
/// guarded by the queue's single fetch slot.
pub async fn swipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SwipeRequest>,
) -> AppResult<Json<SessionView>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    let Some(current) = session.queue.current().cloned() else {
        return Err(AppError::InvalidInput(
            "Nothing to swipe; the queue is empty or exhausted".to_string(),
        ));
    };

    if request.direction == SwipeDirection::Right {
        state.likes.append(&current);
        tracing::info!(video_id = %current.video.id, "Video liked");
    }

    let needs_refill = session.queue.advance();
    if needs_refill {
        if let Some(ticket) = session.queue.begin_fetch() {
            let refill_query = query::build(&session.preferences, Some(&session.base_query));
            let page_token = session.queue.next_page_token().map(str::to_string);
            let seen_ids = session.queue.seen_ids().clone();
            tokio::spawn(refill_session(
                state.clone(),
                id,
                ticket,
                refill_query,
                page_token,
                seen_ids,
            ));
        }
    }

    Ok(Json(SessionView::of(session, None)))
}

/// Background refill: one fetch-enrich cycle appended when it completes
///
/// The ticket carries the queue generation, so a refill that races a reset
/// is discarded by `complete_fetch` instead of landing in the fresh queue.
async fn refill_session(
    state: AppState,
    session_id: Uuid,
    ticket: FetchTicket,
    fetch_query: String,
    page_token: Option<String>,
    seen_ids: HashSet<String>,
) {
    let result = state
        .discovery
        .fetch_enriched_page(
            &fetch_query,
            SESSION_PAGE_SIZE,
            page_token.as_deref(),
            &seen_ids,
        )
        .await;

    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        return;
    };

    match result {
        Ok(page) => {
            session
                .queue
                .complete_fetch(ticket, page.videos, page.next_page_token, true);
        }
        Err(e) => {
            tracing::error!(error = %e, session = %session_id, "Refill failed");
            session.queue.abort_fetch(ticket);
        }
    }
}

/// Clear the session queue and re-run the initial query
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    // Reset under the lock, fetch outside it; the ticket keeps a racing
    // older cycle from appending into the fresh queue.
    let (ticket, fetch_query) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        session.queue.reset();
        let ticket = session.queue.begin_fetch();
        (ticket, query::build(&session.preferences, None))
    };

    let mut notice = None;
    if let Some(ticket) = ticket {
        let result = state
            .discovery
            .fetch_enriched_page(&fetch_query, SESSION_PAGE_SIZE, None, &HashSet::new())
            .await;

        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        match result {
            Ok(page) => {
                session
                    .queue
                    .complete_fetch(ticket, page.videos, page.next_page_token, false);
                if session.queue.remaining() == 0 {
                    notice = Some(NO_VIDEOS_NOTICE.to_string());
                }
            }
            Err(e) => {
                tracing::error!(error = %e, session = %id, "Fetch after reset failed");
                session.queue.abort_fetch(ticket);
                notice = Some(SEARCH_FAILED_NOTICE.to_string());
            }
        }
    }

    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
    Ok(Json(SessionView::of(session, notice)))
}

/// All liked videos, oldest first
pub async fn list_likes(State(state): State<AppState>) -> Json<Vec<EnrichedVideo>> {
    Json(state.likes.list())
}

/// Remove a liked video by id
pub async fn remove_like(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.likes.remove(&id);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_augment_query_joins_categories_with_or() {
        let prefs = Preferences {
            categories: vec!["Gaming".to_string(), "Music".to_string()],
            custom_topics: "speedruns".to_string(),
            ..Default::default()
        };
        assert_eq!(
            augment_query("best of", Some(&prefs)),
            "best of Gaming OR Music speedruns"
        );
    }

    #[test]
    fn test_augment_query_without_preferences() {
        assert_eq!(augment_query("cats", None), "cats");
        assert_eq!(
            augment_query("cats", Some(&Preferences::default())),
            "cats"
        );
    }

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"query": "rust"}"#).unwrap();
        assert_eq!(request.max_results, 10);
        assert_eq!(request.page_token, None);
        assert!(request.preferences.is_none());
    }
}

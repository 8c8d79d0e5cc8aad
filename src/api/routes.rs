use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Stateless provider endpoints
        .route("/api/search", post(handlers::search))
        .route("/api/highlights", post(handlers::highlights))
        .route("/api/chat", post(handlers::chat))
        // Swipe sessions
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/:id/current", get(handlers::current_video))
        .route("/api/sessions/:id/swipe", post(handlers::swipe))
        .route("/api/sessions/:id/reset", post(handlers::reset_session))
        // Liked videos
        .route("/api/likes", get(handlers::list_likes))
        .route("/api/likes/:id", delete(handlers::remove_like))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod queue;

pub use queue::{FetchTicket, QueueState, RecommendationQueue, REFILL_THRESHOLD};

use serde::Deserialize;
use uuid::Uuid;

use crate::{models::Preferences, services::query};

/// Swipe decision sent by the client
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Skip the video
    Left,
    /// Like the video
    Right,
}

/// One user's interaction session
///
/// Owns the preference snapshot, the base query derived from it, and the
/// recommendation queue. Sessions live in shared state keyed by id.
pub struct SwipeSession {
    pub id: Uuid,
    pub preferences: Preferences,
    /// Base query without the per-call freshness token, reused for refills
    pub base_query: String,
    pub queue: RecommendationQueue,
}

impl SwipeSession {
    /// Creates a session with an empty queue
    pub fn new(preferences: Preferences) -> Self {
        let base_query = query::base_query(&preferences);
        Self {
            id: Uuid::new_v4(),
            preferences,
            base_query,
            queue: RecommendationQueue::new(),
        }
    }
}

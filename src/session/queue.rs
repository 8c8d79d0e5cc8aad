/// Recommendation queue
///
/// Ordered, append-only sequence of enriched videos with a monotonic cursor,
/// owned by one swipe session. Appends go through a fetch ticket so that only
/// one fetch-enrich cycle can be in flight at a time, and results from a
/// cycle started before a `reset()` are discarded instead of landing in the
/// fresh queue.
use std::collections::HashSet;

use serde::Serialize;

use crate::models::EnrichedVideo;

/// A refill is requested once this few unswiped items remain
pub const REFILL_THRESHOLD: usize = 5;

/// Observable queue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// No items and nothing in flight
    Empty,
    /// A fetch-enrich cycle is in flight and no item is showable
    Loading,
    /// The cursor points at a showable item
    Ready,
    /// Every fetched item has been swiped
    Exhausted,
}

/// Permission to run one fetch-enrich cycle
///
/// Tied to the queue generation at issue time; a completion carrying a ticket
/// from a previous generation is stale and gets dropped.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct RecommendationQueue {
    items: Vec<EnrichedVideo>,
    cursor: usize,
    seen_ids: HashSet<String>,
    pages_fetched: u32,
    next_page_token: Option<String>,
    fetch_in_flight: bool,
    generation: u64,
}

impl RecommendationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> QueueState {
        if self.cursor < self.items.len() {
            QueueState::Ready
        } else if self.fetch_in_flight {
            QueueState::Loading
        } else if self.items.is_empty() {
            QueueState::Empty
        } else {
            QueueState::Exhausted
        }
    }

    /// The item under the cursor, if any
    pub fn current(&self) -> Option<&EnrichedVideo> {
        self.items.get(self.cursor)
    }

    /// Unswiped items remaining, including the current one
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.cursor)
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// Ids of every video fetched this session, shown or still queued
    pub fn seen_ids(&self) -> &HashSet<String> {
        &self.seen_ids
    }

    /// Move past the current item
    ///
    /// Returns true when the queue is running low and a refill should be
    /// requested. The cursor never moves past `items.len()`, keeping the
    /// `cursor <= items.len()` invariant.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.items.len() {
            self.cursor += 1;
        }
        self.remaining() <= REFILL_THRESHOLD
    }

    /// Claim the single fetch slot
    ///
    /// Returns None while another cycle is in flight, so rapid swiping cannot
    /// race two refills into duplicate or interleaved appends.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.fetch_in_flight {
            return None;
        }
        self.fetch_in_flight = true;
        Some(FetchTicket {
            generation: self.generation,
        })
    }

    /// Release the fetch slot without appending (fetch failed)
    pub fn abort_fetch(&mut self, ticket: FetchTicket) {
        if ticket.generation == self.generation {
            self.fetch_in_flight = false;
        }
    }

    /// Absorb a completed fetch-enrich cycle
    ///
    /// Stale completions (ticket issued before the last reset) are dropped
    /// entirely. Items whose id is already known are skipped, so no two queue
    /// entries ever share an id. Returns the number of items appended.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        videos: Vec<EnrichedVideo>,
        next_page_token: Option<String>,
        is_refill: bool,
    ) -> usize {
        if ticket.generation != self.generation {
            tracing::debug!(
                dropped = videos.len(),
                "Discarding fetch results from before a reset"
            );
            return 0;
        }

        self.fetch_in_flight = false;

        let mut appended = 0;
        for video in videos {
            if self.seen_ids.insert(video.video.id.clone()) {
                self.items.push(video);
                appended += 1;
            }
        }

        self.next_page_token = next_page_token;
        if is_refill {
            self.pages_fetched += 1;
        }

        tracing::info!(
            appended,
            total = self.items.len(),
            cursor = self.cursor,
            "Queue absorbed fetch results"
        );
        appended
    }

    /// Clear all state for a "start over"
    ///
    /// Bumps the generation so any cycle still in flight completes into the
    /// void rather than into the fresh queue.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen_ids.clear();
        self.cursor = 0;
        self.pages_fetched = 0;
        self.next_page_token = None;
        self.fetch_in_flight = false;
        self.generation += 1;
    }
}

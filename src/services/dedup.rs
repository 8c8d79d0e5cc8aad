use std::collections::HashSet;

use crate::models::VideoCandidate;

/// Drops candidates that were already shown this session
///
/// Pure function: keeps only candidates with a non-empty id not present in
/// `seen_ids`, preserving relative order. Candidates without an id cannot be
/// deduplicated later and are dropped outright.
pub fn filter_unseen(
    candidates: Vec<VideoCandidate>,
    seen_ids: &HashSet<String>,
) -> Vec<VideoCandidate> {
    candidates
        .into_iter()
        .filter(|c| !c.id.is_empty() && !seen_ids.contains(&c.id))
        .collect()
}

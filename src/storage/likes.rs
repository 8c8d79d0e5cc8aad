/// Liked-videos persistence
///
/// A single JSON array of enriched videos behind one storage key, mirroring
/// the client-side store this service replaces. Storage failures are logged
/// and swallowed at this boundary: the liked list degrades to empty rather
/// than failing a swipe.
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::EnrichedVideo,
};

/// Contract the queue consumes for the liked-videos list
pub trait LikeStore: Send + Sync {
    /// Append a liked video; never fails
    fn append(&self, video: &EnrichedVideo);

    /// Remove every liked entry with this id; never fails
    fn remove(&self, id: &str);

    /// All liked videos, oldest first; empty on storage failure
    fn list(&self) -> Vec<EnrichedVideo>;
}

/// Like store backed by a JSON file on disk
pub struct JsonFileLikeStore {
    path: PathBuf,
    // Serializes read-modify-write cycles across handler tasks.
    lock: Mutex<()>,
}

impl JsonFileLikeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> AppResult<Vec<EnrichedVideo>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("parse {}: {}", self.path.display(), e)))
    }

    fn write(&self, videos: &[EnrichedVideo]) -> AppResult<()> {
        let raw = serde_json::to_string(videos)
            .map_err(|e| AppError::Storage(format!("serialize liked videos: {}", e)))?;
        fs::write(&self.path, raw)
            .map_err(|e| AppError::Storage(format!("write {}: {}", self.path.display(), e)))
    }

    fn update(&self, apply: impl FnOnce(&mut Vec<EnrichedVideo>)) -> AppResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut videos = self.read()?;
        apply(&mut videos);
        self.write(&videos)
    }
}

impl LikeStore for JsonFileLikeStore {
    fn append(&self, video: &EnrichedVideo) {
        let video = video.clone();
        if let Err(e) = self.update(|videos| videos.push(video)) {
            tracing::warn!(error = %e, "Failed to persist liked video");
        }
    }

    fn remove(&self, id: &str) {
        if let Err(e) = self.update(|videos| videos.retain(|v| v.video.id != id)) {
            tracing::warn!(error = %e, video_id = %id, "Failed to remove liked video");
        }
    }

    fn list(&self) -> Vec<EnrichedVideo> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.read() {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read liked videos; serving empty list");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoCandidate;
    use tempfile::tempdir;

    fn enriched(id: &str) -> EnrichedVideo {
        EnrichedVideo {
            video: VideoCandidate {
                id: id.to_string(),
                title: format!("video {}", id),
                channel: "channel".to_string(),
                thumbnail: String::new(),
                duration: "1:00".to_string(),
                views: "10".to_string(),
                published_at: None,
                description: None,
            },
            highlights: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    #[test]
    fn test_missing_file_lists_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileLikeStore::new(dir.path().join("likes.json"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_like_unlike_round_trip() {
        // Scenario: liking then unliking "x" restores the pre-like state.
        let dir = tempdir().unwrap();
        let store = JsonFileLikeStore::new(dir.path().join("likes.json"));

        store.append(&enriched("a"));
        let before = store.list();

        store.append(&enriched("x"));
        assert_eq!(store.list().len(), 2);

        store.remove("x");
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_append_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("likes.json");

        JsonFileLikeStore::new(&path).append(&enriched("a"));
        let listed = JsonFileLikeStore::new(&path).list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].video.id, "a");
    }

    #[test]
    fn test_remove_drops_every_entry_with_id() {
        let dir = tempdir().unwrap();
        let store = JsonFileLikeStore::new(dir.path().join("likes.json"));
        store.append(&enriched("a"));
        store.append(&enriched("a"));
        store.append(&enriched("b"));

        store.remove("a");
        let ids: Vec<String> = store.list().into_iter().map(|v| v.video.id).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("likes.json");
        fs::write(&path, "not json at all").unwrap();

        let store = JsonFileLikeStore::new(&path);
        assert!(store.list().is_empty());
        // Appending over a corrupt file is swallowed too; nothing panics.
        store.append(&enriched("a"));
    }
}

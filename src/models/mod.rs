pub mod preferences;
pub mod video;

pub use preferences::{Preferences, VideoLength};
pub use video::{EnrichedVideo, SearchPage, VideoCandidate};

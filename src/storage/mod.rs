pub mod likes;

pub use likes::{JsonFileLikeStore, LikeStore};

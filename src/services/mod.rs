pub mod chat;
pub mod dedup;
pub mod discovery;
pub mod enrich;
pub mod providers;
pub mod query;

pub use chat::ChatService;
pub use discovery::DiscoveryService;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    services::{
        providers::{GeminiClient, OpenAiClient, YouTubeProvider},
        ChatService, DiscoveryService,
    },
    session::SwipeSession,
    storage::{JsonFileLikeStore, LikeStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Active swipe sessions keyed by id
    pub sessions: Arc<RwLock<HashMap<Uuid, SwipeSession>>>,
    pub discovery: Arc<DiscoveryService>,
    pub chat: Arc<ChatService>,
    pub likes: Arc<dyn LikeStore>,
}

impl AppState {
    /// Creates application state from pre-built collaborators
    pub fn new(
        discovery: Arc<DiscoveryService>,
        chat: Arc<ChatService>,
        likes: Arc<dyn LikeStore>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            discovery,
            chat,
            likes,
        }
    }

    /// Wires the production provider stack from configuration
    pub fn from_config(config: &Config) -> Self {
        let youtube = Arc::new(YouTubeProvider::new(
            config.youtube_api_key.clone(),
            config.youtube_api_url.clone(),
        ));
        let openai = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
        ));
        let gemini = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
        ));

        let discovery = Arc::new(DiscoveryService::new(youtube, openai.clone()));
        let chat = Arc::new(ChatService::new(vec![openai, gemini]));
        let likes = Arc::new(JsonFileLikeStore::new(&config.likes_path));

        Self::new(discovery, chat, likes)
    }
}

//! Storykeep core
//!
//! Flow logic for a family story archive: capture a draft, carry it across
//! navigation, promote it to a durable story with attached media, and keep
//! audio playback exclusive while browsing.
//!
//! The crate is organized hexagonally:
//! - [`domain`]: plain data types shared by every layer
//! - [`ports`]: traits the services depend on
//! - [`adapters`]: HTTP and in-process implementations of the ports
//! - [`services`]: draft cache, save orchestrator, playback coordinator

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod utils;

use adapters::api::{ApiConfig, HttpMediaStorage, HttpStoryApi, HttpTranscriptionService};
use adapters::session::InMemorySessionStore;
use adapters::views::CountingStoryViews;
use domain::draft::Draft;
use error::{AppError, Result};
use ports::media::MediaStoragePort;
use ports::session::SessionStorePort;
use ports::stories::StoryApiPort;
use ports::transcription::TranscriptionServicePort;
use ports::views::StoryViewsPort;
use services::draft_cache::DraftTransferCache;
use services::playback::PlaybackCoordinator;
use services::save::{SaveConfig, SaveOrchestrator};
use std::sync::Arc;

/// Shared application state
///
/// Created once at startup and handed to every flow.
pub struct AppState {
    pub drafts: Arc<DraftTransferCache>,
    pub saver: Arc<SaveOrchestrator>,
    pub playback: Arc<PlaybackCoordinator>,
    pub session: Arc<dyn SessionStorePort>,
    pub views: Arc<dyn StoryViewsPort>,
}

impl AppState {
    /// Wire the services onto explicit port implementations
    pub fn new(
        stories: Arc<dyn StoryApiPort>,
        media: Arc<dyn MediaStoragePort>,
        transcription: Arc<dyn TranscriptionServicePort>,
        session: Arc<dyn SessionStorePort>,
        views: Arc<dyn StoryViewsPort>,
        config: SaveConfig,
    ) -> Self {
        let saver = SaveOrchestrator::new(
            stories,
            media,
            transcription,
            Arc::clone(&session),
            Arc::clone(&views),
            config,
        );

        Self {
            drafts: Arc::new(DraftTransferCache::new()),
            saver: Arc::new(saver),
            playback: Arc::new(PlaybackCoordinator::new()),
            session,
            views,
        }
    }

    /// Wire the services onto the HTTP backend
    pub fn connect(config: ApiConfig) -> Self {
        let session: Arc<dyn SessionStorePort> = Arc::new(InMemorySessionStore::new());
        let views: Arc<dyn StoryViewsPort> = Arc::new(CountingStoryViews::new());
        Self::new(
            Arc::new(HttpStoryApi::new(config.clone())),
            Arc::new(HttpMediaStorage::new(config.clone())),
            Arc::new(HttpTranscriptionService::new(config)),
            session,
            views,
            SaveConfig::default(),
        )
    }

    /// Take a parked draft out of the cache for the capture screen.
    ///
    /// A miss reads the same whether the key never existed or its hold
    /// expired: either way there is nothing to resume.
    pub fn resume_draft(&self, key: &str) -> Result<Draft> {
        let draft = self
            .drafts
            .consume(key)
            .ok_or_else(|| AppError::CacheMiss(format!("draft {}", key)))?;
        log::info!("Draft \"{}\" resumed from key {}", draft.title, key);
        Ok(draft)
    }
}

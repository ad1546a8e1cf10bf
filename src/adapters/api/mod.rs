//! HTTP adapters for the story backend
//!
//! One small client per concern, all sharing [`ApiConfig`]:
//! - stories: scalar CRUD with revision-conditional updates
//! - media: upload targets, binary PUTs, photo attach
//! - transcription: narration enhancement

pub mod media;
pub mod stories;
pub mod transcription;

pub use media::HttpMediaStorage;
pub use stories::HttpStoryApi;
pub use transcription::HttpTranscriptionService;

use crate::error::AppError;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings shared by the HTTP adapters
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL, e.g. "https://api.storykeep.example"
    pub base_url: String,

    /// Request timeout applied to every call
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub(crate) fn build_client(config: &ApiConfig) -> Client {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Map a transport error, keeping timeouts distinct
pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(format!("{}: {}", context, err))
    } else {
        AppError::Http(err)
    }
}

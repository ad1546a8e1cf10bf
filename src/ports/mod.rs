/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod media;
pub mod session;
pub mod stories;
pub mod transcription;
pub mod views;

#[cfg(test)]
pub mod mocks;

pub use media::{MediaStoragePort, PhotoAttachMeta, UploadTarget};
pub use session::SessionStorePort;
pub use stories::StoryApiPort;
pub use transcription::{EnhanceConfig, EnhancementResult, TranscriptionServicePort};
pub use views::{StoryView, StoryViewsPort};

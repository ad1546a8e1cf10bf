/// Application services
///
/// Flow-level logic built on the port traits: holding drafts across
/// navigation, promoting them to stories, and arbitrating playback.
pub mod draft_cache;
pub mod playback;
pub mod save;

pub use draft_cache::DraftTransferCache;
pub use playback::{PlaybackCoordinator, PlaybackHandle, StopCallback};
pub use save::{SaveConfig, SaveOrchestrator, SaveOutcome, SkippedMedia};

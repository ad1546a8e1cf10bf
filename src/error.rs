/// Error types for Storykeep
///
/// Uses thiserror for ergonomic error handling with proper Display implementations.
use thiserror::Error;

/// Main error type for the application
///
/// The variants map to how the UI reacts: validation stays inline on the
/// form, not-found/unauthorized redirect with a notice, a media upload
/// failure is absorbed per attachment, and an entity write failure surfaces
/// a retry affordance with the draft kept in memory.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Conflicting update: {0}")]
    Conflict(String),

    #[error("Story write failed: {0}")]
    EntityWrite(String),

    #[error("Media upload failed: {0}")]
    MediaUpload(String),

    #[error("Transcription service error: {0}")]
    Transcription(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Nothing to resume: {0}")]
    CacheMiss(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Convert AppError to a string for UI boundaries
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

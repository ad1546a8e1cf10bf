/// Transcription service port trait
///
/// Defines the interface for the speech-to-text enhancement service. The
/// service is best-effort: a failure must never block manual text entry.
/// Implementation: HTTP adapter
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of transcribing one draft narration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementResult {
    /// Full transcript text
    pub transcript: String,

    /// Lesson/wisdom suggestions derived from the narration
    pub lesson_suggestions: Vec<String>,
}

/// Configuration for an enhancement request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Language code (e.g., "en", "es")
    pub language: Option<String>,

    /// Prompt the storyteller was answering, if any; improves suggestions
    pub prompt_context: Option<String>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            prompt_context: None,
        }
    }
}

/// Port trait for the transcription/enhancement service
#[async_trait]
pub trait TranscriptionServicePort: Send + Sync {
    /// Transcribe narration from raw bytes
    async fn transcribe_bytes(
        &self,
        audio_data: &[u8],
        format: &str, // "wav", "m4a", etc.
        config: &EnhanceConfig,
    ) -> Result<EnhancementResult>;
}

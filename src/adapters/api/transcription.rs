//! Transcription service adapter
//!
//! Implements the TranscriptionServicePort against the enhancement
//! endpoint. The narration goes up as multipart form data together with a
//! JSON options part; the response carries the transcript and any lesson
//! suggestions in one shot.

use super::{build_client, transport_error, ApiConfig};
use crate::error::{AppError, Result};
use crate::ports::transcription::{EnhanceConfig, EnhancementResult, TranscriptionServicePort};
use crate::utils::audio::content_type_for;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

pub struct HttpTranscriptionService {
    client: Client,
    config: ApiConfig,
}

impl HttpTranscriptionService {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: build_client(&config),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl TranscriptionServicePort for HttpTranscriptionService {
    async fn transcribe_bytes(
        &self,
        audio_data: &[u8],
        format: &str,
        config: &EnhanceConfig,
    ) -> Result<EnhancementResult> {
        log::info!(
            "Submitting {} bytes of {} narration for enhancement",
            audio_data.len(),
            format
        );

        let part = Part::bytes(audio_data.to_vec())
            .file_name(format!("narration.{}", format))
            .mime_str(content_type_for(format))
            .map_err(|e| {
                AppError::Transcription(format!("Invalid narration media type: {}", e))
            })?;
        let form = Form::new()
            .part("audio", part)
            .text("options", serde_json::to_string(config)?);

        let response = self
            .client
            .post(self.url("enhance"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("enhance narration", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Transcription(format!(
                "enhance returned {}: {}",
                status, error_text
            )));
        }

        let enhanced: EnhanceResponse = response.json().await.map_err(|e| {
            AppError::Transcription(format!("Failed to parse enhance response: {}", e))
        })?;

        log::info!(
            "Narration enhanced: {} chars, {} suggestion(s)",
            enhanced.transcript.len(),
            enhanced.lesson_suggestions.len()
        );

        Ok(EnhancementResult {
            transcript: enhanced.transcript,
            lesson_suggestions: enhanced.lesson_suggestions,
        })
    }
}

// ===== API Request/Response Types =====

#[derive(Debug, Deserialize)]
struct EnhanceResponse {
    transcript: String,
    #[serde(default)]
    lesson_suggestions: Vec<String>,
}

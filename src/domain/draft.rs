//! In-progress story drafts
//!
//! A draft is the client-held, not-yet-persisted form of a story. It lives
//! only in memory or in the transfer cache and is promoted into a durable
//! record by the save orchestrator; discarding it leaves no trace.

use crate::domain::models::CropTransform;
use crate::error::{AppError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest capture year accepted for a story
pub const MIN_STORY_YEAR: i32 = 1900;

/// Where a draft came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftOrigin {
    /// Started from an empty capture screen
    Blank,
    /// Answer to a suggested prompt
    Prompt { prompt_id: String },
    /// Imported from an external source, e.g. a scanned letter
    Import { source: String },
}

/// A photo staged on a draft
///
/// Whether the bytes already live in object storage or are still held in
/// client memory is part of the type, so the upload step branches on one
/// structure instead of a parallel side-channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DraftPhoto {
    /// Already in object storage (typically when editing an existing story)
    Uploaded {
        path: String,
        transform: CropTransform,
        is_hero: bool,
    },
    /// Raw bytes not yet uploaded
    PendingLocal {
        bytes: Vec<u8>,
        extension: String,
        transform: CropTransform,
        is_hero: bool,
    },
}

impl DraftPhoto {
    /// Whether the storyteller marked this photo as the cover
    pub fn is_hero(&self) -> bool {
        match self {
            DraftPhoto::Uploaded { is_hero, .. } => *is_hero,
            DraftPhoto::PendingLocal { is_hero, .. } => *is_hero,
        }
    }

    /// Framing chosen for this photo
    pub fn transform(&self) -> CropTransform {
        match self {
            DraftPhoto::Uploaded { transform, .. } => *transform,
            DraftPhoto::PendingLocal { transform, .. } => *transform,
        }
    }
}

/// Audio narration staged on a draft, at most one per draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DraftAudio {
    /// Already in object storage
    Uploaded { url: String, duration_secs: f64 },
    /// Raw recording not yet uploaded; the recorder may supply a duration
    /// hint for formats whose header we cannot parse
    PendingLocal {
        bytes: Vec<u8>,
        extension: String,
        duration_hint: Option<f64>,
    },
}

/// An in-progress story being captured or edited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,

    /// Narrative text, typed or transcribed
    pub transcript: String,

    /// Lesson/wisdom text the storyteller wants to pass on
    pub wisdom: Option<String>,

    pub is_favorite: bool,
    pub is_private: bool,

    /// Photos in display order
    pub photos: Vec<DraftPhoto>,

    pub audio: Option<DraftAudio>,
    pub origin: DraftOrigin,

    /// Wisdom candidates derived from the narration, offered in the UI
    pub lesson_suggestions: Vec<String>,
}

impl Draft {
    /// Creates an empty draft
    pub fn new(title: String, origin: DraftOrigin) -> Self {
        Self {
            title,
            year: None,
            month: None,
            day: None,
            transcript: String::new(),
            wisdom: None,
            is_favorite: false,
            is_private: false,
            photos: Vec::new(),
            audio: None,
            origin,
            lesson_suggestions: Vec::new(),
        }
    }

    /// Prompt this draft answers, if any
    pub fn prompt_id(&self) -> Option<&str> {
        match &self.origin {
            DraftOrigin::Prompt { prompt_id } => Some(prompt_id),
            _ => None,
        }
    }

    /// Checks the draft is complete enough to persist.
    ///
    /// Runs before any network call so an incomplete draft never produces a
    /// stub record. Month and day are shape-checked only; the entity API
    /// owns calendar validation.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("story title is required".to_string()));
        }
        if self.transcript.trim().is_empty() {
            return Err(AppError::Validation("story text is required".to_string()));
        }

        let year = self
            .year
            .ok_or_else(|| AppError::Validation("story year is required".to_string()))?;
        let current_year = chrono::Utc::now().year();
        if year < MIN_STORY_YEAR || year > current_year {
            return Err(AppError::Validation(format!(
                "story year must be between {} and {}",
                MIN_STORY_YEAR, current_year
            )));
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::Validation(format!("invalid month: {}", month)));
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(AppError::Validation(format!("invalid day: {}", day)));
            }
        }

        Ok(())
    }
}

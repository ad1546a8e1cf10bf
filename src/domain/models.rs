/// Domain models for Storykeep
///
/// These models represent core business entities and are platform-agnostic.
use serde::{Deserialize, Serialize};

/// Kind of media object attached to a story
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Photo,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Photo => write!(f, "photo"),
        }
    }
}

/// Crop and zoom applied when a photo was framed by the storyteller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CropTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    pub zoom: f32,
}

impl Default for CropTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// A photo permanently attached to a story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoAttachment {
    /// Permanent storage path, e.g. "stories/{id}/photo_1.jpg"
    pub path: String,

    /// Whether this photo is the story's cover image
    pub is_hero: bool,

    /// Framing chosen when the photo was added
    pub transform: CropTransform,
}

/// Audio narration attached to a story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAttachment {
    /// Public URL where the narration is served
    pub url: String,

    /// Playback length in seconds; display logic divides by this
    pub duration_secs: f64,
}

/// A durable story record
///
/// The ID and revision come from the server; the revision goes back out on
/// every update so a concurrent write surfaces as a conflict instead of a
/// silent overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub text: String,
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub age: i32,
    pub is_favorite: bool,
    pub is_private: bool,
    pub wisdom: Option<String>,
    pub prompt_id: Option<String>,
    pub audio: Option<AudioAttachment>,
    pub photos: Vec<PhotoAttachment>,
    pub revision: u64,
    pub created_at: i64, // Unix timestamp
    pub updated_at: i64,
}

impl Story {
    /// Whether any attached photo is marked as the cover
    pub fn has_hero(&self) -> bool {
        self.photos.iter().any(|p| p.is_hero)
    }
}

/// Scalar fields sent when creating a story
///
/// The server assigns the ID and starts the revision counter; media is
/// always attached after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub text: String,
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub age: i32,
    pub is_favorite: bool,
    pub is_private: bool,
    pub wisdom: Option<String>,
    pub prompt_id: Option<String>,
}

/// Profile details needed when deriving story scalars
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorytellerProfile {
    pub birth_year: Option<i32>,
}

impl StorytellerProfile {
    /// Age of the storyteller in the given capture year, clamped at zero.
    /// Zero when the birth year is unknown.
    pub fn age_in(&self, year: i32) -> i32 {
        match self.birth_year {
            Some(birth_year) => (year - birth_year).max(0),
            None => 0,
        }
    }
}

/// Domain layer - core business models
///
/// These models are platform-agnostic and represent core business entities.
pub mod draft;
pub mod models;

pub use draft::{Draft, DraftAudio, DraftOrigin, DraftPhoto};
pub use models::{
    AudioAttachment, CropTransform, MediaKind, NewStory, PhotoAttachment, Story,
    StorytellerProfile,
};

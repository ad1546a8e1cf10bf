/// Media storage port trait
///
/// Defines the interface for uploading story media and linking it to the
/// owning record. Uploads are scoped under a story ID, so the story must
/// exist before storage will hand out a target.
/// Implementation: HTTP adapter
use crate::domain::models::{CropTransform, MediaKind};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Destination handed out by the storage service for one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTarget {
    /// Pre-authorized URL the binary is PUT to
    pub upload_url: String,

    /// Permanent storage path recorded on the story after upload
    pub path: String,

    /// Public URL where the object is served once uploaded
    pub public_url: String,
}

/// Attachment metadata sent when linking an uploaded photo to its story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoAttachMeta {
    pub is_hero: bool,
    pub transform: CropTransform,
}

/// Port trait for media storage operations
#[async_trait]
pub trait MediaStoragePort: Send + Sync {
    /// Request an upload destination scoped under the owning story
    async fn request_upload_target(
        &self,
        story_id: &str,
        kind: MediaKind,
        extension: &str,
    ) -> Result<UploadTarget>;

    /// Upload raw bytes to a previously requested target
    async fn upload(&self, target: &UploadTarget, bytes: &[u8], content_type: &str) -> Result<()>;

    /// Link an uploaded photo to its story, carrying the permanent path,
    /// hero flag, and crop transform. An attach with the hero flag set
    /// takes over as the story's cover: the backend clears the flag on any
    /// previously attached hero, so at most one photo ever carries it.
    /// Audio is linked through the story record itself, not through this
    /// call.
    async fn attach_photo(&self, story_id: &str, path: &str, meta: &PhotoAttachMeta)
        -> Result<()>;
}

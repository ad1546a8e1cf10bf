/// Story entity API port trait
///
/// Defines the interface for the remote story record service.
/// Implementation: HTTP adapter
use crate::domain::models::{NewStory, Story};
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for story record operations
#[async_trait]
pub trait StoryApiPort: Send + Sync {
    /// Create a story from scalar fields; the server assigns the ID and
    /// starts the revision counter
    async fn create(&self, story: &NewStory) -> Result<Story>;

    /// Fetch a story by ID. A missing record surfaces as `NotFound`, a
    /// record the caller cannot see as `Unauthorized`.
    async fn fetch(&self, id: &str) -> Result<Story>;

    /// Replace a story's full shape, conditional on `story.revision`.
    ///
    /// The server does not merge, so partial updates must read the current
    /// state first and send everything back. A revision mismatch surfaces
    /// as `Conflict`; the returned story carries the new revision.
    async fn update(&self, story: &Story) -> Result<Story>;

    /// Delete a story and its attachments
    async fn delete(&self, id: &str) -> Result<()>;
}

//! Save orchestrator
//!
//! Turns an in-memory draft into a persisted story plus attached media.
//! Storage uploads are scoped under a story ID, so a brand-new story is
//! created with scalar fields first and its media attached step by step
//! afterwards; any single attachment can fail without failing the save.
//!
//! The narration URL is recorded through a read-then-write of the full
//! story shape, conditional on the fetched revision, so nothing written in
//! between is clobbered. "Saved" is only ever reported from a re-fetched
//! final state.

use crate::domain::draft::{Draft, DraftAudio, DraftPhoto};
use crate::domain::models::{AudioAttachment, MediaKind, NewStory, Story, StorytellerProfile};
use crate::error::{AppError, Result};
use crate::ports::media::{MediaStoragePort, PhotoAttachMeta};
use crate::ports::session::{keys, SessionStorePort};
use crate::ports::stories::StoryApiPort;
use crate::ports::transcription::{EnhanceConfig, TranscriptionServicePort};
use crate::ports::views::{StoryView, StoryViewsPort};
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Route used when no return location was captured at flow start
pub const DEFAULT_DESTINATION: &str = "/stories";

/// Tuning for save flows
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Deadline applied to every network step; a hung request surfaces as
    /// a timeout instead of an indefinitely stuck save
    pub step_timeout: Duration,

    /// Read-modify-write attempts for the narration update before a
    /// conflict is surfaced
    pub conflict_retries: u32,

    /// Floor for the narration duration scalar; playback UIs divide by it
    pub min_audio_duration_secs: f64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(60),
            conflict_retries: 3,
            min_audio_duration_secs: 1.0,
        }
    }
}

/// An attachment dropped from an otherwise successful save
#[derive(Debug, Clone, Serialize)]
pub struct SkippedMedia {
    /// Human-readable slot, e.g. "photo 2" or "narration"
    pub label: String,
    pub kind: MediaKind,
    pub reason: String,
}

/// Result of a completed save
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    /// Final server state, re-fetched after the last write
    pub story: Story,

    /// Media dropped along the way; empty on a clean save
    pub skipped: Vec<SkippedMedia>,

    /// Route to navigate to next
    pub destination: String,
}

/// Orchestrates draft promotion and story edits
pub struct SaveOrchestrator {
    stories: Arc<dyn StoryApiPort>,
    media: Arc<dyn MediaStoragePort>,
    transcription: Arc<dyn TranscriptionServicePort>,
    session: Arc<dyn SessionStorePort>,
    views: Arc<dyn StoryViewsPort>,
    config: SaveConfig,
}

impl SaveOrchestrator {
    pub fn new(
        stories: Arc<dyn StoryApiPort>,
        media: Arc<dyn MediaStoragePort>,
        transcription: Arc<dyn TranscriptionServicePort>,
        session: Arc<dyn SessionStorePort>,
        views: Arc<dyn StoryViewsPort>,
        config: SaveConfig,
    ) -> Self {
        Self {
            stories,
            media,
            transcription,
            session,
            views,
            config,
        }
    }

    /// Fetch a story for the edit screen.
    ///
    /// Not-found and unauthorized are terminal here; the caller redirects
    /// with a notice instead of offering a retry.
    pub async fn load_for_edit(&self, story_id: &str) -> Result<Story> {
        self.with_deadline("fetch story", self.stories.fetch(story_id))
            .await
    }

    /// Best-effort transcription of the draft's pending narration.
    ///
    /// On success the transcript is filled (only when still empty) and
    /// lesson suggestions are appended. Any failure is logged and leaves
    /// the draft untouched, so manual text entry is never blocked. Returns
    /// whether the draft was enriched.
    pub async fn transcribe_draft(&self, draft: &mut Draft, config: &EnhanceConfig) -> bool {
        let enhanced = match &draft.audio {
            Some(DraftAudio::PendingLocal {
                bytes, extension, ..
            }) => {
                self.with_deadline(
                    "transcribe narration",
                    self.transcription.transcribe_bytes(bytes, extension, config),
                )
                .await
            }
            _ => {
                log::debug!("No local narration to transcribe");
                return false;
            }
        };

        match enhanced {
            Ok(result) => {
                if draft.transcript.trim().is_empty() {
                    draft.transcript = result.transcript;
                }
                draft.lesson_suggestions.extend(result.lesson_suggestions);
                log::info!(
                    "Draft enriched from narration ({} suggestion(s))",
                    draft.lesson_suggestions.len()
                );
                true
            }
            Err(e) => {
                log::warn!("Narration transcription failed, keeping manual entry: {}", e);
                false
            }
        }
    }

    /// Create a new story from a draft, then attach its media.
    ///
    /// Scalars are validated and written first; the narration and each
    /// photo then upload independently. Per-item failures are absorbed
    /// into [`SaveOutcome::skipped`], never into a failed save.
    pub async fn save_new(
        &self,
        draft: &Draft,
        profile: &StorytellerProfile,
    ) -> Result<SaveOutcome> {
        draft.validate()?;
        let new_story = self.new_story_from(draft, profile)?;

        log::info!("Creating story \"{}\"", new_story.title);
        let created = self
            .with_deadline("create story", self.stories.create(&new_story))
            .await?;
        log::info!("Created story {}", created.id);

        let mut skipped = Vec::new();

        // Narration goes first so its URL is on the record before photos
        // land. A failure drops the narration, not the save.
        if let Some(audio) = &draft.audio {
            match self.attach_audio(&created.id, audio).await {
                Ok(_) => log::info!("Narration attached to story {}", created.id),
                Err(e) => {
                    log::warn!("Skipping narration for story {}: {}", created.id, e);
                    skipped.push(SkippedMedia {
                        label: "narration".to_string(),
                        kind: MediaKind::Audio,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Photos attach in display order
        skipped.extend(
            self.attach_photos(&created.id, &draft.photos, created.has_hero())
                .await,
        );

        self.finish(&created.id, skipped).await
    }

    /// Update an existing story from a draft.
    ///
    /// Scalar changes are written first with a conditional update; each
    /// media item the story does not have yet then uploads and attaches
    /// independently, so one failed photo never blocks the text changes.
    pub async fn save_existing(
        &self,
        story_id: &str,
        draft: &Draft,
        profile: &StorytellerProfile,
    ) -> Result<SaveOutcome> {
        draft.validate()?;

        // Terminal when the story is gone or not ours; the caller
        // redirects, no retry.
        let current = self
            .with_deadline("fetch story", self.stories.fetch(story_id))
            .await?;

        let updated = self.apply_scalars(&current, draft, profile)?;
        let story = self
            .with_deadline("update story", self.stories.update(&updated))
            .await?;
        log::info!(
            "Updated story {} scalars (revision {})",
            story.id,
            story.revision
        );

        let mut skipped = Vec::new();

        if let Some(audio) = Self::new_audio_for(&story, draft) {
            match self.attach_audio(&story.id, audio).await {
                Ok(_) => log::info!("Narration attached to story {}", story.id),
                Err(e) => {
                    log::warn!("Skipping narration for story {}: {}", story.id, e);
                    skipped.push(SkippedMedia {
                        label: "narration".to_string(),
                        kind: MediaKind::Audio,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Only photos the story does not already carry
        let existing_paths: HashSet<String> =
            story.photos.iter().map(|p| p.path.clone()).collect();
        let new_photos: Vec<DraftPhoto> = draft
            .photos
            .iter()
            .filter(|photo| match photo {
                DraftPhoto::Uploaded { path, .. } => !existing_paths.contains(path),
                DraftPhoto::PendingLocal { .. } => true,
            })
            .cloned()
            .collect();
        skipped.extend(
            self.attach_photos(&story.id, &new_photos, story.has_hero())
                .await,
        );

        self.finish(&story.id, skipped).await
    }

    /// Remove a story permanently and refresh the story list view
    pub async fn delete_story(&self, story_id: &str) -> Result<()> {
        self.with_deadline("delete story", self.stories.delete(story_id))
            .await?;
        self.views.mark_stale(StoryView::MyStories);
        log::info!("Deleted story {}", story_id);
        Ok(())
    }

    /// Applies the per-step deadline so a hung request cannot leave the
    /// flow stuck in "saving"
    async fn with_deadline<T, F>(&self, step: &str, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.config.step_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{} after {:?}",
                step, self.config.step_timeout
            ))),
        }
    }

    fn new_story_from(&self, draft: &Draft, profile: &StorytellerProfile) -> Result<NewStory> {
        let year = draft
            .year
            .ok_or_else(|| AppError::Validation("story year is required".to_string()))?;
        Ok(NewStory {
            title: draft.title.trim().to_string(),
            text: draft.transcript.clone(),
            year,
            month: draft.month,
            day: draft.day,
            age: profile.age_in(year),
            is_favorite: draft.is_favorite,
            is_private: draft.is_private,
            wisdom: draft.wisdom.clone(),
            prompt_id: draft.prompt_id().map(String::from),
        })
    }

    /// Copy the draft's editable scalars onto a fetched story
    fn apply_scalars(
        &self,
        current: &Story,
        draft: &Draft,
        profile: &StorytellerProfile,
    ) -> Result<Story> {
        let year = draft
            .year
            .ok_or_else(|| AppError::Validation("story year is required".to_string()))?;
        let mut updated = current.clone();
        updated.title = draft.title.trim().to_string();
        updated.text = draft.transcript.clone();
        updated.year = year;
        updated.month = draft.month;
        updated.day = draft.day;
        updated.age = profile.age_in(year);
        updated.is_favorite = draft.is_favorite;
        updated.is_private = draft.is_private;
        updated.wisdom = draft.wisdom.clone();
        if let Some(prompt_id) = draft.prompt_id() {
            updated.prompt_id = Some(prompt_id.to_string());
        }
        Ok(updated)
    }

    /// The draft's narration when it is new to the story: local bytes
    /// always are; an already-uploaded URL only when the story points
    /// somewhere else.
    fn new_audio_for<'a>(story: &Story, draft: &'a Draft) -> Option<&'a DraftAudio> {
        match &draft.audio {
            Some(DraftAudio::PendingLocal { .. }) => draft.audio.as_ref(),
            Some(DraftAudio::Uploaded { url, .. }) => {
                let unchanged = story.audio.as_ref().map(|a| a.url.as_str()) == Some(url.as_str());
                if unchanged {
                    None
                } else {
                    draft.audio.as_ref()
                }
            }
            None => None,
        }
    }

    /// Upload (when local) and record the narration on the story
    async fn attach_audio(&self, story_id: &str, audio: &DraftAudio) -> Result<Story> {
        let attachment = match audio {
            DraftAudio::PendingLocal {
                bytes,
                extension,
                duration_hint,
            } => {
                let target = self
                    .with_deadline(
                        "request narration upload target",
                        self.media
                            .request_upload_target(story_id, MediaKind::Audio, extension),
                    )
                    .await?;
                self.with_deadline(
                    "upload narration",
                    self.media.upload(
                        &target,
                        bytes,
                        crate::utils::audio::content_type_for(extension),
                    ),
                )
                .await?;

                // WAV header first, recorder hint second, floor last
                let duration_secs = crate::utils::audio::wav_duration_secs(bytes)
                    .or(*duration_hint)
                    .filter(|d| *d > 0.0)
                    .unwrap_or(self.config.min_audio_duration_secs);

                AudioAttachment {
                    url: target.public_url,
                    duration_secs,
                }
            }
            DraftAudio::Uploaded { url, duration_secs } => AudioAttachment {
                url: url.clone(),
                duration_secs: if *duration_secs > 0.0 {
                    *duration_secs
                } else {
                    self.config.min_audio_duration_secs
                },
            },
        };

        self.set_audio(story_id, attachment).await
    }

    /// Read-then-write that changes only the audio field.
    ///
    /// Conditional on the fetched revision so an interleaved write cannot
    /// be clobbered; retried a bounded number of times on conflict.
    async fn set_audio(&self, story_id: &str, audio: AudioAttachment) -> Result<Story> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut current = self
                .with_deadline("fetch story", self.stories.fetch(story_id))
                .await?;
            current.audio = Some(audio.clone());

            match self
                .with_deadline("set narration", self.stories.update(&current))
                .await
            {
                Ok(updated) => return Ok(updated),
                Err(AppError::Conflict(reason)) if attempt < self.config.conflict_retries => {
                    log::debug!(
                        "Narration update conflicted (attempt {}): {}",
                        attempt,
                        reason
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Upload and attach photos in order, absorbing per-item failures.
    ///
    /// The first photo marked as hero keeps the flag and later marks are
    /// ignored; attaching it takes the cover from any hero the story
    /// already has. When none is marked and the story has no hero yet, the
    /// first photo that fully uploads and attaches becomes the hero.
    async fn attach_photos(
        &self,
        story_id: &str,
        photos: &[DraftPhoto],
        story_has_hero: bool,
    ) -> Vec<SkippedMedia> {
        let marked_hero = photos.iter().position(|photo| photo.is_hero());
        let mut hero_pending = marked_hero.is_none() && !story_has_hero && !photos.is_empty();
        let mut skipped = Vec::new();

        for (index, photo) in photos.iter().enumerate() {
            let label = format!("photo {}", index + 1);
            let is_hero = match marked_hero {
                Some(marked) => marked == index,
                None => hero_pending,
            };

            match self.attach_photo(story_id, photo, is_hero).await {
                Ok(path) => {
                    if is_hero {
                        hero_pending = false;
                    }
                    log::info!("Attached {} to story {} as {}", label, story_id, path);
                }
                Err(e) => {
                    log::warn!("Skipping {} for story {}: {}", label, story_id, e);
                    skipped.push(SkippedMedia {
                        label,
                        kind: MediaKind::Photo,
                        reason: e.to_string(),
                    });
                }
            }
        }

        skipped
    }

    async fn attach_photo(
        &self,
        story_id: &str,
        photo: &DraftPhoto,
        is_hero: bool,
    ) -> Result<String> {
        let meta = PhotoAttachMeta {
            is_hero,
            transform: photo.transform(),
        };

        match photo {
            DraftPhoto::PendingLocal {
                bytes, extension, ..
            } => {
                let target = self
                    .with_deadline(
                        "request photo upload target",
                        self.media
                            .request_upload_target(story_id, MediaKind::Photo, extension),
                    )
                    .await?;
                self.with_deadline(
                    "upload photo",
                    self.media.upload(
                        &target,
                        bytes,
                        crate::utils::audio::content_type_for(extension),
                    ),
                )
                .await?;
                self.with_deadline(
                    "attach photo",
                    self.media.attach_photo(story_id, &target.path, &meta),
                )
                .await?;
                Ok(target.path)
            }
            DraftPhoto::Uploaded { path, .. } => {
                self.with_deadline(
                    "attach photo",
                    self.media.attach_photo(story_id, path, &meta),
                )
                .await?;
                Ok(path.clone())
            }
        }
    }

    /// Re-fetch the final server state, clear flow flags, and mark the
    /// read views stale. Saved is only ever reported from here.
    async fn finish(&self, story_id: &str, skipped: Vec<SkippedMedia>) -> Result<SaveOutcome> {
        let story = self
            .with_deadline("confirm story", self.stories.fetch(story_id))
            .await?;

        let destination = self
            .session
            .take(keys::RETURN_LOCATION)
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string());
        self.session.remove(keys::CAPTURE_IN_PROGRESS);

        self.views.mark_stale(StoryView::MyStories);
        self.views.mark_stale(StoryView::NextPrompt);

        if skipped.is_empty() {
            log::info!("Story {} saved, navigating to {}", story.id, destination);
        } else {
            log::warn!(
                "Story {} saved with {} skipped attachment(s)",
                story.id,
                skipped.len()
            );
        }

        Ok(SaveOutcome {
            story,
            skipped,
            destination,
        })
    }
}

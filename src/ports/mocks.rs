//! Mock implementations for testing

use crate::domain::models::{NewStory, PhotoAttachment, Story};
use crate::domain::MediaKind;
use crate::error::{AppError, Result};
use crate::ports::media::{MediaStoragePort, PhotoAttachMeta, UploadTarget};
use crate::ports::stories::StoryApiPort;
use crate::ports::transcription::{EnhanceConfig, EnhancementResult, TranscriptionServicePort};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock story API for testing
///
/// Behaves like the real service: IDs are assigned on create, updates are
/// conditional on the carried revision, and failures can be scripted.
#[derive(Clone, Default)]
pub struct MockStoryApi {
    stories: Arc<Mutex<HashMap<String, Story>>>,
    next_id: Arc<Mutex<i64>>,
    update_calls: Arc<Mutex<u32>>,
    fail_creates: Arc<Mutex<bool>>,
    fail_updates: Arc<Mutex<bool>>,
    conflict_updates: Arc<Mutex<u32>>,
    denied: Arc<Mutex<HashSet<String>>>,
    fetch_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockStoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> String {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        format!("story-{}", *id)
    }

    /// Seed a story as if it already existed server-side
    pub fn insert(&self, story: Story) {
        self.stories.lock().unwrap().insert(story.id.clone(), story);
    }

    /// Current server-side state of a story
    pub fn get(&self, id: &str) -> Option<Story> {
        self.stories.lock().unwrap().get(id).cloned()
    }

    pub fn story_count(&self) -> usize {
        self.stories.lock().unwrap().len()
    }

    pub fn update_calls(&self) -> u32 {
        *self.update_calls.lock().unwrap()
    }

    /// Make every create fail with an entity write error
    pub fn fail_creates(&self, fail: bool) {
        *self.fail_creates.lock().unwrap() = fail;
    }

    /// Make every update fail with an entity write error
    pub fn fail_updates(&self, fail: bool) {
        *self.fail_updates.lock().unwrap() = fail;
    }

    /// Reject the next `count` updates with a conflict, as if another
    /// writer got in between
    pub fn conflict_next_updates(&self, count: u32) {
        *self.conflict_updates.lock().unwrap() = count;
    }

    /// Make fetches of `id` come back unauthorized
    pub fn deny(&self, id: &str) {
        self.denied.lock().unwrap().insert(id.to_string());
    }

    /// Delay every fetch, for exercising step deadlines
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl StoryApiPort for MockStoryApi {
    async fn create(&self, story: &NewStory) -> Result<Story> {
        if *self.fail_creates.lock().unwrap() {
            return Err(AppError::EntityWrite("scripted create failure".to_string()));
        }

        let id = self.next_id();
        let now = chrono::Utc::now().timestamp();
        let created = Story {
            id: id.clone(),
            title: story.title.clone(),
            text: story.text.clone(),
            year: story.year,
            month: story.month,
            day: story.day,
            age: story.age,
            is_favorite: story.is_favorite,
            is_private: story.is_private,
            wisdom: story.wisdom.clone(),
            prompt_id: story.prompt_id.clone(),
            audio: None,
            photos: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        };
        self.stories.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    async fn fetch(&self, id: &str) -> Result<Story> {
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.denied.lock().unwrap().contains(id) {
            return Err(AppError::Unauthorized(format!("story {}", id)));
        }

        self.stories
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("story {}", id)))
    }

    async fn update(&self, story: &Story) -> Result<Story> {
        *self.update_calls.lock().unwrap() += 1;

        if *self.fail_updates.lock().unwrap() {
            return Err(AppError::EntityWrite("scripted update failure".to_string()));
        }

        {
            let mut conflicts = self.conflict_updates.lock().unwrap();
            if *conflicts > 0 {
                *conflicts -= 1;
                return Err(AppError::Conflict(format!(
                    "story {} was modified by another writer",
                    story.id
                )));
            }
        }

        let mut stories = self.stories.lock().unwrap();
        let current = stories
            .get(&story.id)
            .ok_or_else(|| AppError::NotFound(format!("story {}", story.id)))?;
        if current.revision != story.revision {
            return Err(AppError::Conflict(format!(
                "story {} is at revision {}, caller sent {}",
                story.id, current.revision, story.revision
            )));
        }

        let mut next = story.clone();
        next.revision += 1;
        next.updated_at = chrono::Utc::now().timestamp();
        stories.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.stories.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Mock media storage for testing
///
/// Built with [`MockMediaStorage::linked`] it shares the story map with a
/// [`MockStoryApi`], so a photo attach lands on the story record and bumps
/// its revision the way the real backend does. Individual uploads and
/// attaches can be scripted to fail by path fragment.
#[derive(Clone, Default)]
pub struct MockMediaStorage {
    stories: Arc<Mutex<HashMap<String, Story>>>,
    uploads: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    attachments: Arc<Mutex<Vec<(String, String, PhotoAttachMeta)>>>,
    seqs: Arc<Mutex<HashMap<String, i64>>>,
    fail_upload_fragments: Arc<Mutex<HashSet<String>>>,
    fail_attach_fragments: Arc<Mutex<HashSet<String>>>,
}

impl MockMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share the story map with `api` so attaches modify story records
    pub fn linked(api: &MockStoryApi) -> Self {
        Self {
            stories: Arc::clone(&api.stories),
            ..Self::default()
        }
    }

    fn next_seq(&self, kind: MediaKind) -> i64 {
        let mut seqs = self.seqs.lock().unwrap();
        let seq = seqs.entry(kind.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }

    /// Fail uploads whose target path contains `fragment`
    pub fn fail_upload_matching(&self, fragment: &str) {
        self.fail_upload_fragments
            .lock()
            .unwrap()
            .insert(fragment.to_string());
    }

    /// Fail attaches whose path contains `fragment`
    pub fn fail_attach_matching(&self, fragment: &str) {
        self.fail_attach_fragments
            .lock()
            .unwrap()
            .insert(fragment.to_string());
    }

    /// Bytes received for `path`, if the upload happened
    pub fn uploaded(&self, path: &str) -> Option<Vec<u8>> {
        self.uploads.lock().unwrap().get(path).cloned()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn attachments(&self) -> Vec<(String, String, PhotoAttachMeta)> {
        self.attachments.lock().unwrap().clone()
    }

    fn matches_any(path: &str, fragments: &Mutex<HashSet<String>>) -> bool {
        fragments
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| path.contains(fragment))
    }
}

#[async_trait]
impl MediaStoragePort for MockMediaStorage {
    async fn request_upload_target(
        &self,
        story_id: &str,
        kind: MediaKind,
        extension: &str,
    ) -> Result<UploadTarget> {
        let path = format!(
            "stories/{}/{}_{}.{}",
            story_id,
            kind,
            self.next_seq(kind),
            extension
        );
        Ok(UploadTarget {
            upload_url: format!("mock://upload/{}", path),
            public_url: format!("https://media.test/{}", path),
            path,
        })
    }

    async fn upload(&self, target: &UploadTarget, bytes: &[u8], _content_type: &str) -> Result<()> {
        if Self::matches_any(&target.path, &self.fail_upload_fragments) {
            return Err(AppError::MediaUpload(format!(
                "scripted upload failure for {}",
                target.path
            )));
        }
        self.uploads
            .lock()
            .unwrap()
            .insert(target.path.clone(), bytes.to_vec());
        Ok(())
    }

    async fn attach_photo(
        &self,
        story_id: &str,
        path: &str,
        meta: &PhotoAttachMeta,
    ) -> Result<()> {
        if Self::matches_any(path, &self.fail_attach_fragments) {
            return Err(AppError::MediaUpload(format!(
                "scripted attach failure for {}",
                path
            )));
        }

        self.attachments
            .lock()
            .unwrap()
            .push((story_id.to_string(), path.to_string(), meta.clone()));

        // Mirror the real backend: the attach lands on the story record and
        // moves its revision. A hero attach takes the cover, so any
        // previous hero loses its flag.
        let mut stories = self.stories.lock().unwrap();
        if let Some(story) = stories.get_mut(story_id) {
            if meta.is_hero {
                for photo in &mut story.photos {
                    photo.is_hero = false;
                }
            }
            story.photos.push(PhotoAttachment {
                path: path.to_string(),
                is_hero: meta.is_hero,
                transform: meta.transform,
            });
            story.revision += 1;
        }
        Ok(())
    }
}

/// Mock transcription service for testing
#[derive(Clone, Default)]
pub struct MockTranscription {
    result: Arc<Mutex<Option<EnhancementResult>>>,
    fail: Arc<Mutex<bool>>,
    calls: Arc<Mutex<usize>>,
}

impl MockTranscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, transcript: &str, suggestions: &[&str]) {
        *self.result.lock().unwrap() = Some(EnhancementResult {
            transcript: transcript.to_string(),
            lesson_suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        });
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptionServicePort for MockTranscription {
    async fn transcribe_bytes(
        &self,
        _audio_data: &[u8],
        _format: &str,
        _config: &EnhanceConfig,
    ) -> Result<EnhancementResult> {
        *self.calls.lock().unwrap() += 1;

        if *self.fail.lock().unwrap() {
            return Err(AppError::Transcription(
                "scripted transcription failure".to_string(),
            ));
        }

        Ok(self
            .result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(EnhancementResult {
                transcript: "mock transcript".to_string(),
                lesson_suggestions: Vec::new(),
            }))
    }
}

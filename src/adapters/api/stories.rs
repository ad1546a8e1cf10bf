//! Story API adapter
//!
//! Implements the StoryApiPort against the backend's REST surface.
//! Updates send the fetched revision in `If-Match`; the backend answers
//! 409 or 412 when another writer got there first, and that surfaces as a
//! conflict instead of a silent overwrite.

use super::{build_client, transport_error, ApiConfig};
use crate::domain::models::{NewStory, Story};
use crate::error::{AppError, Result};
use crate::ports::stories::StoryApiPort;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

pub struct HttpStoryApi {
    client: Client,
    config: ApiConfig,
}

impl HttpStoryApi {
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
impl StoryApiPort for HttpStoryApi {
    async fn create(&self, story: &NewStory) -> Result<Story> {
        log::info!("Creating story \"{}\"", story.title);

        let response = self
            .client
            .post(self.url("stories"))
            .json(story)
            .send()
            .await
            .map_err(|e| transport_error("create story", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::EntityWrite(format!(
                "create returned {}: {}",
                status, error_text
            )));
        }

        let created: Story = response.json().await?;
        log::info!("Story {} created", created.id);
        Ok(created)
    }

    async fn fetch(&self, id: &str) -> Result<Story> {
        log::debug!("Fetching story {}", id);

        let response = self
            .client
            .get(self.url(&format!("stories/{}", id)))
            .send()
            .await
            .map_err(|e| transport_error("fetch story", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("story {}", id))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Unauthorized(format!("story {}", id)))
            }
            _ => Ok(response.error_for_status()?.json().await?),
        }
    }

    async fn update(&self, story: &Story) -> Result<Story> {
        log::debug!(
            "Updating story {} at revision {}",
            story.id,
            story.revision
        );

        let response = self
            .client
            .put(self.url(&format!("stories/{}", story.id)))
            .header(reqwest::header::IF_MATCH, story.revision.to_string())
            .json(story)
            .send()
            .await
            .map_err(|e| transport_error("update story", e))?;

        match response.status() {
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Err(AppError::Conflict(
                format!("story {} changed since revision {}", story.id, story.revision),
            )),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("story {}", story.id))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Unauthorized(format!("story {}", story.id)))
            }
            status if !status.is_success() => {
                let error_text = response.text().await.unwrap_or_default();
                Err(AppError::EntityWrite(format!(
                    "update returned {}: {}",
                    status, error_text
                )))
            }
            _ => Ok(response.json().await?),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        log::info!("Deleting story {}", id);

        let response = self
            .client
            .delete(self.url(&format!("stories/{}", id)))
            .send()
            .await
            .map_err(|e| transport_error("delete story", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("story {}", id))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Unauthorized(format!("story {}", id)))
            }
            status if !status.is_success() => {
                let error_text = response.text().await.unwrap_or_default();
                Err(AppError::EntityWrite(format!(
                    "delete returned {}: {}",
                    status, error_text
                )))
            }
            _ => Ok(()),
        }
    }
}

//! Media storage adapter
//!
//! Implements the MediaStoragePort against the backend's upload flow:
//! 1. Ask the backend for an upload target scoped under the story
//! 2. PUT the binary to the pre-authorized URL
//! 3. For photos, attach the permanent path back onto the story; a hero
//!    attach takes over as the story's cover

use super::{build_client, transport_error, ApiConfig};
use crate::domain::models::{CropTransform, MediaKind};
use crate::error::{AppError, Result};
use crate::ports::media::{MediaStoragePort, PhotoAttachMeta, UploadTarget};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct HttpMediaStorage {
    client: Client,
    config: ApiConfig,
}

impl HttpMediaStorage {
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
impl MediaStoragePort for HttpMediaStorage {
    async fn request_upload_target(
        &self,
        story_id: &str,
        kind: MediaKind,
        extension: &str,
    ) -> Result<UploadTarget> {
        log::debug!("Requesting {} upload target for story {}", kind, story_id);

        let request = UploadTargetRequest {
            kind,
            extension: extension.to_string(),
        };
        let response = self
            .client
            .post(self.url(&format!("stories/{}/media/upload-target", story_id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("request upload target", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::MediaUpload(format!(
                "upload target request returned {}: {}",
                status, error_text
            )));
        }

        let target: UploadTargetResponse = response.json().await?;
        Ok(UploadTarget {
            upload_url: target.upload_url,
            path: target.path,
            public_url: target.url,
        })
    }

    async fn upload(&self, target: &UploadTarget, bytes: &[u8], content_type: &str) -> Result<()> {
        log::info!("Uploading {} bytes to {}", bytes.len(), target.path);

        let response = self
            .client
            .put(&target.upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| transport_error("upload media", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::MediaUpload(format!(
                "upload of {} returned {}: {}",
                target.path, status, error_text
            )));
        }
        Ok(())
    }

    async fn attach_photo(
        &self,
        story_id: &str,
        path: &str,
        meta: &PhotoAttachMeta,
    ) -> Result<()> {
        log::debug!("Attaching photo {} to story {}", path, story_id);

        let request = AttachPhotoRequest {
            path: path.to_string(),
            is_hero: meta.is_hero,
            transform: meta.transform,
        };
        let response = self
            .client
            .post(self.url(&format!("stories/{}/media/attach", story_id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("attach photo", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::MediaUpload(format!(
                "attach of {} returned {}: {}",
                path, status, error_text
            )));
        }
        Ok(())
    }
}

// ===== API Request/Response Types =====

#[derive(Debug, Serialize)]
struct UploadTargetRequest {
    kind: MediaKind,
    extension: String,
}

#[derive(Debug, Deserialize)]
struct UploadTargetResponse {
    upload_url: String,
    path: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct AttachPhotoRequest {
    path: String,
    is_hero: bool,
    transform: CropTransform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_target_request_shape() {
        let request = UploadTargetRequest {
            kind: MediaKind::Photo,
            extension: "jpg".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "photo");
        assert_eq!(json["extension"], "jpg");
    }

    #[test]
    fn test_attach_request_carries_transform() {
        let request = AttachPhotoRequest {
            path: "stories/story-1/photo_1.jpg".to_string(),
            is_hero: true,
            transform: CropTransform {
                offset_x: 0.1,
                offset_y: -0.2,
                zoom: 1.5,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["is_hero"], true);
        assert_eq!(json["transform"]["zoom"], 1.5);
    }
}

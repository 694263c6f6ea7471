//! Image hosting collaborator
//!
//! Product photos and activation proof screenshots are uploaded to a hosted
//! CDN; the ledger only ever stores the returned URL.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use shared::{AppError, AppResult};

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload raw bytes; returns the public URL
    async fn upload(&self, bytes: &[u8], filename: &str) -> AppResult<String>;
}

/// Placeholder bound when no CDN credentials are configured
pub struct UnconfiguredImageHost;

#[async_trait]
impl ImageHost for UnconfiguredImageHost {
    async fn upload(&self, _bytes: &[u8], _filename: &str) -> AppResult<String> {
        Err(AppError::upstream("image host not configured"))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Unsigned-upload client for a Cloudinary-style CDN
pub struct CloudinaryHost {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryHost {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, bytes: &[u8], filename: &str) -> AppResult<String> {
        let mime = match filename.rsplit('.').next() {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };
        let data_uri = format!("data:{mime};base64,{}", BASE64.encode(bytes));

        let response = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                self.cloud_name
            ))
            .json(&serde_json::json!({
                "file": data_uri,
                "upload_preset": self.upload_preset,
            }))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("image upload failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::upstream(format!("image upload failed: {e}")))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("malformed upload response: {e}")))?;
        Ok(body.secure_url)
    }
}

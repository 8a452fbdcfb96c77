use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::BlobConfig;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("upload rejected: {0}")]
    Upload(String),

    #[error("deletion rejected: {0}")]
    Delete(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Result of a successful upload: a public URL plus the opaque reference
/// used for later deletion.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub url: String,
    pub reference: String,
}

/// An image file received from a multipart request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// External object storage for item images and user avatars
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredBlob, BlobError>;
    async fn delete(&self, reference: &str) -> Result<(), BlobError>;
}

/// HTTP-backed blob store client
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpBlobStore {
    pub fn new(config: &BlobConfig) -> Result<Self, BlobError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: String,
    public_id: String,
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredBlob, BlobError> {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.filename)
            .mime_str(&image.content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlobError::Upload(format!("status {}", response.status())));
        }

        let body: UploadResponse = response.json().await?;
        Ok(StoredBlob {
            url: body.url,
            reference: body.public_id,
        })
    }

    async fn delete(&self, reference: &str) -> Result<(), BlobError> {
        let response = self
            .client
            .delete(format!("{}/blobs/{}", self.base_url, reference))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlobError::Delete(format!("status {}", response.status())));
        }
        Ok(())
    }
}

/// Best-effort deletion for stale or orphaned blobs. Failures are logged and
/// swallowed; they must never fail the surrounding request.
pub async fn delete_quietly(store: &dyn BlobStore, reference: &str) {
    if let Err(e) = store.delete(reference).await {
        tracing::warn!("failed to delete blob {}: {}", reference, e);
    }
}

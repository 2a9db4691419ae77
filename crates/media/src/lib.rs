//! Media host adapter.
//!
//! The media host accepts a binary upload and returns a durable URL. It is
//! used once per course, for the thumbnail, and the upload must succeed
//! BEFORE the course row is written (upload-then-commit ordering -- the API
//! layer enforces it by sequencing the calls).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// HTTP request timeout for a single upload.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for media host operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media host returned a non-2xx status code.
    #[error("Media host returned HTTP {0}")]
    HttpStatus(u16),

    /// The media host response could not be decoded.
    #[error("Malformed media host response: {0}")]
    MalformedResponse(String),
}

/// A successfully stored upload.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Durable public URL of the stored file.
    pub url: String,
}

/// Seam between the API layer and the external media host.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedMedia, MediaError>;
}

/// Connection settings for the media host.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Full upload endpoint URL.
    pub upload_url: String,
    /// Bearer token for upload calls.
    pub api_key: String,
}

impl MediaConfig {
    /// Load media host configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `MEDIA_UPLOAD_URL` | **yes**  | --      |
    /// | `MEDIA_API_KEY`    | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing.
    pub fn from_env() -> Self {
        let upload_url = std::env::var("MEDIA_UPLOAD_URL")
            .expect("MEDIA_UPLOAD_URL must be set in the environment");
        let api_key =
            std::env::var("MEDIA_API_KEY").expect("MEDIA_API_KEY must be set in the environment");
        Self {
            upload_url,
            api_key,
        }
    }
}

/// Wire shape of the media host's upload response.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Talks to the real media host over HTTPS using a multipart upload.
pub struct HttpMediaHost {
    client: reqwest::Client,
    config: MediaConfig,
}

impl HttpMediaHost {
    /// Create a media host client with a pre-configured request timeout.
    pub fn new(config: MediaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedMedia, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| MediaError::MalformedResponse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.upload_url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(filename, status = status.as_u16(), "Media upload rejected");
            return Err(MediaError::HttpStatus(status.as_u16()));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::MalformedResponse(e.to_string()))?;

        Ok(UploadedMedia { url: uploaded.url })
    }
}

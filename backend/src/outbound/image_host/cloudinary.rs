//! Reqwest-backed adapter for Cloudinary-compatible signed uploads.
//!
//! Owns transport only: request signing, multipart encoding, timeout and
//! status mapping, and decoding `secure_url` out of the response.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ImageUrl;
use crate::domain::ports::{ImageHost, ImageHostError};

/// Upload API root used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

const UPLOAD_FILE_NAME: &str = "upload";

/// Account credentials for signed uploads.
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
}

/// Image host adapter that POSTs signed multipart uploads to one account.
pub struct CloudinaryImageHost {
    client: Client,
    upload_url: Url,
    api_key: String,
    api_secret: Zeroizing<String>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    message: String,
}

impl CloudinaryImageHost {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ImageHostError::Transport`] when the API base cannot be
    /// joined with the cloud name or the reqwest client cannot be built.
    pub fn new(
        api_base: &str,
        credentials: CloudinaryCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ImageHostError> {
        let upload_url = upload_url(api_base, &credentials.cloud_name)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ImageHostError::transport(err.to_string()))?;
        Ok(Self {
            client,
            upload_url,
            api_key: credentials.api_key,
            api_secret: credentials.api_secret,
            clock,
        })
    }

    /// Endpoint receiving uploads.
    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

fn upload_url(api_base: &str, cloud_name: &str) -> Result<Url, ImageHostError> {
    let cloud_name = cloud_name.trim();
    if cloud_name.is_empty() {
        return Err(ImageHostError::transport("cloud name must not be empty"));
    }
    let raw = format!(
        "{}/{cloud_name}/image/upload",
        api_base.trim().trim_end_matches('/')
    );
    Url::parse(&raw).map_err(|err| ImageHostError::transport(format!("invalid upload url {raw}: {err}")))
}

/// Hex SHA-256 over the sorted signed parameters followed by the secret.
fn sign(timestamp: i64, api_secret: &str) -> String {
    let mut digest = Sha256::new();
    digest.update(format!("timestamp={timestamp}").as_bytes());
    digest.update(api_secret.as_bytes());
    hex::encode(digest.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn upload(&self, bytes: Vec<u8>) -> Result<ImageUrl, ImageHostError> {
        let timestamp = self.clock.utc().timestamp();
        let size = bytes.len();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(UPLOAD_FILE_NAME))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", sign(timestamp, self.api_secret.as_str()));

        debug!(size, url = %self.upload_url, "uploading image");
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_secure_url(body.as_ref())
    }
}

fn parse_secure_url(body: &[u8]) -> Result<ImageUrl, ImageHostError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body)
        .map_err(|err| ImageHostError::invalid_response(format!("invalid JSON payload: {err}")))?;
    let url = decoded
        .secure_url
        .ok_or_else(|| ImageHostError::invalid_response("response missing secure_url"))?;
    ImageUrl::new(&url).map_err(|err| ImageHostError::invalid_response(err.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> ImageHostError {
    if error.is_timeout() {
        ImageHostError::transport(format!("timed out: {error}"))
    } else {
        ImageHostError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageHostError {
    let message = serde_json::from_slice::<ErrorResponseDto>(body)
        .map(|dto| dto.error.message)
        .unwrap_or_else(|_| body_preview(body));
    ImageHostError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect()
}

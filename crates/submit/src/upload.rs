//! Remote image host client (ImgBB-compatible upload API).

use async_trait::async_trait;
use serde::Deserialize;

use commitment_core::Config;
use commitment_signature::strip_data_uri_prefix;

use crate::outcome::UploadOutcome;

/// 1x1 PNG returned instead of uploading when no real API key is set.
pub const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

const MULTIPART_BOUNDARY: &str = "commitment-form-boundary-5f3a9c1e";

/// Uploads an encoded image and hands back a reference to store.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Never fails; see [`UploadOutcome`].
    async fn upload(&self, encoded_image: &str) -> UploadOutcome;
}

/// Why a real upload attempt did not produce a URL.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("could not reach image host: {0}")]
    Transport(String),

    /// The host answered without `success: true`.
    #[error("{0}")]
    Rejected(String),

    #[error("could not parse image host response: {0}")]
    MalformedResponse(String),

    #[error("upload task failed: {0}")]
    Internal(String),
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: bool,
    data: Option<HostData>,
    error: Option<HostErrorBody>,
}

#[derive(Debug, Deserialize)]
struct HostData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostErrorBody {
    message: Option<String>,
}

/// ImgBB upload client.
#[derive(Debug, Clone)]
pub struct ImgBbClient {
    endpoint: String,
    api_key: String,
    expiration: u64,
}

impl ImgBbClient {
    pub fn new(endpoint: &str, api_key: &str, expiration: u64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            expiration,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.upload_endpoint,
            &config.imgbb_api_key,
            config.imgbb_expiration,
        )
    }

    fn has_real_key(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != commitment_core::config::DEMO_IMGBB_KEY
    }
}

#[async_trait]
impl ImageHost for ImgBbClient {
    async fn upload(&self, encoded_image: &str) -> UploadOutcome {
        if !self.has_real_key() {
            tracing::warn!("no image host API key configured; using placeholder signature image");
            return UploadOutcome::Degraded {
                reference: PLACEHOLDER_IMAGE.to_string(),
                reason: "image host API key not configured".to_string(),
            };
        }

        // ureq is synchronous, so wrap in spawn_blocking
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let expiration = self.expiration;
        let payload = strip_data_uri_prefix(encoded_image).to_string();

        let result = tokio::task::spawn_blocking(move || {
            post_image(&endpoint, &api_key, expiration, &payload)
        })
        .await
        .map_err(|e| UploadError::Internal(e.to_string()))
        .and_then(|r| r);

        match result {
            Ok(url) => {
                tracing::debug!(%url, "signature uploaded");
                UploadOutcome::Delivered { url }
            }
            Err(e) => {
                tracing::warn!(error = %e, "signature upload failed; falling back to encoded image");
                UploadOutcome::Degraded {
                    reference: encoded_image.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Build a `multipart/form-data` body from text fields.
///
/// ureq v3 does not bundle multipart support, so the body is assembled by hand.
fn build_multipart(boundary: &str, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Turn a decoded host response into a URL or a descriptive error.
fn interpret_response(response: HostResponse) -> Result<String, UploadError> {
    if response.success {
        return response
            .data
            .and_then(|d| d.url)
            .ok_or_else(|| UploadError::MalformedResponse("missing data.url".to_string()));
    }
    let message = response
        .error
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Failed to upload image".to_string());
    Err(UploadError::Rejected(message))
}

fn post_image(
    endpoint: &str,
    api_key: &str,
    expiration: u64,
    payload: &str,
) -> Result<String, UploadError> {
    let expiration = expiration.to_string();
    let body = build_multipart(
        MULTIPART_BOUNDARY,
        &[("key", api_key), ("image", payload), ("expiration", &expiration)],
    );
    let content_type = format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}");

    // Error statuses still carry a JSON body with the reason.
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let response = agent
        .post(endpoint)
        .header("Content-Type", &content_type)
        .send(&body)
        .map_err(|e| UploadError::Transport(e.to_string()))?;

    let parsed: HostResponse = response
        .into_body()
        .read_json()
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    interpret_response(parsed)
}

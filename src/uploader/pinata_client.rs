use crate::config::PinataCredentials;
use crate::errors::{AppError, AppResult};
use crate::form_state::ImageFile;
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

pub const DEFAULT_PINATA_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";

/// Browsers name an anonymous `Blob` part "blob"; Pinata stores it under that name.
pub const STORY_BLOB_NAME: &str = "blob";
pub const STORY_MIME_TYPE: &str = "application/json";

/// Successful `pinFileToIPFS` response. Only the content id is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
}

/// One blob to pin, sent as the single `file` part of the multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinBlob {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl PinBlob {
    /// Wraps campaign narrative text the way the web form did
    pub fn story(text: &str) -> Self {
        Self {
            file_name: STORY_BLOB_NAME.to_string(),
            mime_type: STORY_MIME_TYPE.to_string(),
            data: text.as_bytes().to_vec(),
        }
    }

    pub fn image(image: &ImageFile) -> Self {
        Self {
            file_name: image.file_name.clone(),
            mime_type: image.mime_type.clone(),
            data: image.bytes.clone(),
        }
    }

    pub fn build_form(&self) -> AppResult<multipart::Form> {
        let part = multipart::Part::bytes(self.data.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime_type)?;

        Ok(multipart::Form::new().part("file", part))
    }
}

/// Content-addressed storage that accepts a blob and returns its content id
#[async_trait::async_trait]
pub trait PinningService: Send + Sync {
    async fn submit(&self, blob: PinBlob) -> AppResult<PinResponse>;
}

/// Pinata pinning gateway client
pub struct PinataClient {
    client: Client,
    endpoint: String,
    credentials: PinataCredentials,
}

impl PinataClient {
    pub fn new(
        endpoint: &str,
        credentials: PinataCredentials,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.to_string(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl PinningService for PinataClient {
    async fn submit(&self, blob: PinBlob) -> AppResult<PinResponse> {
        let size = blob.data.len();
        let form = blob.build_form()?;

        log::debug!(
            "Pinning {} ({} bytes, {}) via {}",
            blob.file_name,
            size,
            blob.mime_type,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("pinata_api_key", &self.credentials.api_key)
            .header("pinata_secret_api_key", &self.credentials.secret_api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !status.is_success() {
            return Err(AppError::upload_failed(format!(
                "Pinata API error {}: {}",
                status,
                truncate(&body, 300)
            )));
        }

        log::debug!("Pinata response: {}", truncate(&body, 300));
        parse_pin_response(&body)
    }
}

/// Parses a 2xx body; an absent or empty `IpfsHash` counts as malformed.
pub fn parse_pin_response(body: &str) -> AppResult<PinResponse> {
    let parsed: PinResponse = serde_json::from_str(body).map_err(|e| {
        AppError::upload_failed(format!(
            "unexpected Pinata response ({}): {}",
            e,
            truncate(body, 300)
        ))
    })?;

    if parsed.ipfs_hash.trim().is_empty() {
        return Err(AppError::upload_failed("Pinata response has an empty IpfsHash"));
    }

    Ok(parsed)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

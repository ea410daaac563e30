//! HTTP client for songsmith-studio
//!
//! The wizard reaches the service through [`StudioBackend`], so tests can
//! swap in an in-memory fake.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use songsmith_common::api::{
    ErrorResponse, LyricsRequest, LyricsResponse, TrackResponse, LYRICS_FIELD, REFERENCE_FIELD,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::wizard::ReferenceFile;

const USER_AGENT: &str = concat!("SongSmith-UI/", env!("CARGO_PKG_VERSION"));

/// Covers the server's full poll budget plus upload time
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with the failure envelope; `message` is its `error`
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Generation operations the wizard depends on
#[async_trait]
pub trait StudioBackend: Send + Sync {
    /// Returns the generated lyrics text
    async fn generate_lyrics(&self, request: &LyricsRequest) -> Result<String, BackendError>;

    /// Returns the track reference (URL)
    async fn generate_music(
        &self,
        lyrics: &str,
        reference: &ReferenceFile,
    ) -> Result<String, BackendError>;
}

/// reqwest-backed [`StudioBackend`]
pub struct HttpStudioClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpStudioClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| fallback.to_string());
            return Err(BackendError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StudioBackend for HttpStudioClient {
    async fn generate_lyrics(&self, request: &LyricsRequest) -> Result<String, BackendError> {
        info!(mood = %request.mood, genre = %request.genre, "Requesting lyrics");

        let response = self
            .http_client
            .post(format!("{}/api/generate-lyrics", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: LyricsResponse =
            Self::read_envelope(response, "Failed to generate lyrics").await?;
        Ok(body.lyrics)
    }

    async fn generate_music(
        &self,
        lyrics: &str,
        reference: &ReferenceFile,
    ) -> Result<String, BackendError> {
        debug!(
            file_name = reference.file_name(),
            mime = %reference.mime(),
            size_bytes = reference.bytes().len(),
            "Uploading reference"
        );

        let part = reqwest::multipart::Part::bytes(reference.bytes().to_vec())
            .file_name(reference.file_name().to_string())
            .mime_str(reference.mime().as_str())
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part(REFERENCE_FIELD, part)
            .text(LYRICS_FIELD, lyrics.to_string());

        let response = self
            .http_client
            .post(format!("{}/api/generate-music", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: TrackResponse = Self::read_envelope(response, "Failed to generate music").await?;
        info!(track = %body.track, "Track generated");
        Ok(body.track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpStudioClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_server_error_displays_server_message() {
        let err = BackendError::Server {
            status: 400,
            message: "Lyrics are required".to_string(),
        };
        assert_eq!(err.to_string(), "Lyrics are required");
    }
}

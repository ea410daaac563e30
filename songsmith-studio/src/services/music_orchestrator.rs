//! Music generation orchestration
//!
//! For one request:
//! 1. Validate lyrics
//! 2. Encode the reference asset as a base64 `data:` URI
//! 3. Submit exactly one job with the fixed synthesis parameters
//! 4. Wait for it via [`JobPoller`]
//! 5. Release the transient asset, whatever happened in 1-4

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::job_poller::{JobPoller, PollError};
use super::providers::MediaJobProvider;
use super::transient_asset::{release_logged, TransientAsset};
use crate::error::{ApiError, AssetIoError, UpstreamError};
use crate::models::{MusicInput, SynthesisParameters, TrackReference};

/// Provider model used for music
pub const MUSIC_MODEL: &str = "minimax/music-01";

/// Orchestrator errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Lyrics are required")]
    MissingLyrics,

    #[error(transparent)]
    Asset(#[from] AssetIoError),

    #[error("Failed to submit generation job: {0}")]
    Submission(#[source] UpstreamError),

    #[error("{detail}")]
    JobFailed { job_id: String, detail: String },

    #[error("Prediction timed out")]
    TimedOut { job_id: String, attempts: u32 },

    #[error("Failed to check generation status: {0}")]
    StatusCheck(#[source] UpstreamError),

    #[error("Generation abandoned: server is shutting down")]
    Cancelled { job_id: String },

    #[error("Provider reported success without a track")]
    MissingOutput { job_id: String },
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingLyrics => ApiError::Validation(err.to_string()),
            GenerationError::Asset(e) => ApiError::AssetIo(e),
            GenerationError::Submission(ref e) | GenerationError::StatusCheck(ref e) => {
                ApiError::Upstream {
                    details: e.details(),
                    message: err.to_string(),
                }
            }
            GenerationError::JobFailed { job_id, detail } => ApiError::JobFailed { job_id, detail },
            GenerationError::TimedOut { .. } => ApiError::JobTimeout(err.to_string()),
            GenerationError::Cancelled { .. } => ApiError::Unavailable(err.to_string()),
            GenerationError::MissingOutput { .. } => ApiError::Upstream {
                message: err.to_string(),
                details: None,
            },
        }
    }
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Music generation orchestrator
pub struct MusicOrchestrator {
    provider: Arc<dyn MediaJobProvider>,
    poller: JobPoller,
    parameters: SynthesisParameters,
    model: String,
}

impl MusicOrchestrator {
    pub fn new(provider: Arc<dyn MediaJobProvider>) -> Self {
        Self {
            provider,
            poller: JobPoller::default(),
            parameters: SynthesisParameters::POLICY,
            model: MUSIC_MODEL.to_string(),
        }
    }

    pub fn with_poller(mut self, poller: JobPoller) -> Self {
        self.poller = poller;
        self
    }

    /// Generate a track from edited lyrics and a reference asset
    ///
    /// Takes ownership of `asset` and releases it on every exit path. A
    /// release failure is logged and does not change the outcome.
    pub async fn generate(
        &self,
        lyrics: &str,
        asset: TransientAsset,
        cancel: &CancellationToken,
    ) -> Result<TrackReference, GenerationError> {
        let result = self.run(lyrics, &asset, cancel).await;
        release_logged(asset).await;
        result
    }

    async fn run(
        &self,
        lyrics: &str,
        asset: &TransientAsset,
        cancel: &CancellationToken,
    ) -> Result<TrackReference, GenerationError> {
        if lyrics.trim().is_empty() {
            return Err(GenerationError::MissingLyrics);
        }

        let bytes = asset.read().await?;
        tracing::debug!(size_bytes = bytes.len(), "Reference asset read");

        let song_file = encode_data_uri(asset.mime().as_str(), &bytes);
        tracing::debug!(encoded_chars = song_file.len(), "Reference asset encoded");

        let input = MusicInput {
            lyrics: lyrics.to_string(),
            song_file,
            parameters: self.parameters,
        };

        let job = self
            .provider
            .submit(&self.model, &input)
            .await
            .map_err(GenerationError::Submission)?;
        let job_id = job.external_id.clone();

        tracing::info!(
            provider = self.provider.provider_id(),
            job_id = %job_id,
            interval_ms = self.poller.interval().as_millis() as u64,
            max_attempts = self.poller.max_attempts(),
            "Generation job submitted; waiting for completion"
        );

        let provider = Arc::clone(&self.provider);
        let outcome = self
            .poller
            .await_completion(
                &job_id,
                move |id| {
                    let provider = Arc::clone(&provider);
                    async move { provider.fetch(&id).await }
                },
                cancel,
            )
            .await;

        let completed = match outcome {
            Ok(completed) => completed,
            Err(PollError::JobFailed { detail, .. }) => {
                return Err(GenerationError::JobFailed { job_id, detail })
            }
            Err(PollError::TimedOut { attempts }) => {
                return Err(GenerationError::TimedOut { job_id, attempts })
            }
            Err(PollError::Transport(e)) => return Err(GenerationError::StatusCheck(e)),
            Err(PollError::Cancelled { .. }) => return Err(GenerationError::Cancelled { job_id }),
        };

        let track = completed
            .result_reference
            .map(TrackReference)
            .ok_or(GenerationError::MissingOutput {
                job_id: job_id.clone(),
            })?;

        tracing::info!(
            job_id = %job_id,
            attempts = completed.attempts_observed,
            track = %track,
            "Music generation successful"
        );

        Ok(track)
    }
}

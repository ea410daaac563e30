//! Provider seams
//!
//! The text-completion and media-job providers are injected as trait
//! objects so handlers and tests can substitute them.

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::models::{GenerationJob, MusicInput};

/// Synchronous text-completion service
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider identifier for logging (e.g., "OpenAI")
    fn provider_id(&self) -> &'static str;

    /// Issue exactly one completion call for a single user prompt
    ///
    /// # Returns
    /// * `Ok(text)` - First choice content, verbatim
    /// * `Err(_)` - Transport failure or non-success response
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, UpstreamError>;
}

/// Asynchronous, poll-based media-generation service
#[async_trait]
pub trait MediaJobProvider: Send + Sync {
    /// Provider identifier for logging (e.g., "Replicate")
    fn provider_id(&self) -> &'static str;

    /// Submit a generation job; returns the provider's initial snapshot
    async fn submit(&self, model: &str, input: &MusicInput) -> Result<GenerationJob, UpstreamError>;

    /// Read the current status of a job
    async fn fetch(&self, job_id: &str) -> Result<GenerationJob, UpstreamError>;
}

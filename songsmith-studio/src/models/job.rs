//! Generation job state machine (provider-owned)
//!
//! QUEUED → RUNNING → SUCCEEDED | FAILED
//!
//! Status is only ever read from the provider, never written locally.
//! "Timed out" is a poller classification, not a job status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-reported job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Snapshot of a provider job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub external_id: String,
    pub status: JobStatus,
    /// Playable output, present once the job succeeded
    pub result_reference: Option<String>,
    /// Provider error detail, present once the job failed
    pub error_detail: Option<String>,
}

impl GenerationJob {
    pub fn new(external_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            external_id: external_id.into(),
            status,
            result_reference: None,
            error_detail: None,
        }
    }

    pub fn with_result(mut self, reference: impl Into<String>) -> Self {
        self.result_reference = Some(reference.into());
        self
    }

    pub fn with_error(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }
}

/// Job that reached `Succeeded` within the poll budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedJob {
    pub external_id: String,
    /// Number of status fetches performed, including the final one
    pub attempts_observed: u32,
    pub result_reference: Option<String>,
}

/// Playable reference (URL) to a generated track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackReference(pub String);

impl TrackReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

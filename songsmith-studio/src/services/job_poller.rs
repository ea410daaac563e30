//! Bounded polling of provider jobs
//!
//! Turns an asynchronous job handle into a single outcome:
//! - `Succeeded` → `Ok(CompletedJob)` immediately, no further fetches
//! - `Failed` → `PollError::JobFailed` immediately, never retried
//! - `Queued`/`Running` → sleep `interval` (non-blocking), fetch again
//! - budget exhausted → `PollError::TimedOut` after exactly `max_attempts` fetches
//! - fetch transport error → `PollError::Transport` immediately
//!
//! The poller knows nothing about providers: the caller supplies the fetch.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::UpstreamError;
use crate::models::{CompletedJob, GenerationJob, JobStatus};

/// Default wait between status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of status fetches (≈60 s budget with the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Detail used when the provider reports failure without one
const UNKNOWN_FAILURE: &str = "Prediction failed";

/// Poller errors
#[derive(Debug, Error)]
pub enum PollError {
    #[error("{detail}")]
    JobFailed { detail: String, attempts: u32 },

    #[error("Prediction timed out")]
    TimedOut { attempts: u32 },

    #[error("Status check failed: {0}")]
    Transport(#[source] UpstreamError),

    #[error("Polling cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Fixed-interval, bounded-attempt job poller
#[derive(Debug, Clone, Copy)]
pub struct JobPoller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

impl JobPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Upper bound on time spent waiting between fetches
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }

    /// Poll `fetch_status` until the job is terminal or the budget runs out
    ///
    /// No sleep follows the final fetch. A cancelled token stops polling
    /// (the provider job itself keeps running).
    pub async fn await_completion<F, Fut>(
        &self,
        job_id: &str,
        mut fetch_status: F,
        cancel: &CancellationToken,
    ) -> Result<CompletedJob, PollError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<GenerationJob, UpstreamError>>,
    {
        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled {
                    attempts: attempt - 1,
                });
            }

            let job = fetch_status(job_id.to_string()).await.map_err(|e| {
                warn!(job_id, attempt, error = %e, "Error checking job status");
                PollError::Transport(e)
            })?;

            debug!(job_id, attempt, status = %job.status, "Job status");

            match job.status {
                JobStatus::Succeeded => {
                    info!(job_id, attempts = attempt, "Job succeeded");
                    return Ok(CompletedJob {
                        external_id: job.external_id,
                        attempts_observed: attempt,
                        result_reference: job.result_reference,
                    });
                }
                JobStatus::Failed => {
                    let detail = job
                        .error_detail
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or_else(|| UNKNOWN_FAILURE.to_string());
                    warn!(job_id, attempt, detail = %detail, "Job failed");
                    return Err(PollError::JobFailed {
                        detail,
                        attempts: attempt,
                    });
                }
                JobStatus::Queued | JobStatus::Running => {}
            }

            if attempt < self.max_attempts {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = cancel.cancelled() => {
                        return Err(PollError::Cancelled { attempts: attempt });
                    }
                }
            }
        }

        warn!(job_id, attempts = self.max_attempts, "Job poll budget exhausted");
        Err(PollError::TimedOut {
            attempts: self.max_attempts,
        })
    }
}

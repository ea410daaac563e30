//! Replicate predictions client
//!
//! - Submit: `POST /models/{owner}/{name}/predictions`
//! - Status: `GET /predictions/{id}`
//!
//! Prediction status mapping:
//! `starting` → Queued, `processing` → Running, `succeeded` → Succeeded,
//! `failed` / `canceled` → Failed

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use songsmith_common::config::is_valid_key;
use std::time::Duration;

use super::providers::MediaJobProvider;
use crate::error::UpstreamError;
use crate::models::{GenerationJob, JobStatus, MusicInput};

const REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";
const USER_AGENT: &str = concat!("SongSmith/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credential environment variable
pub const REPLICATE_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    input: &'a MusicInput,
}

/// Prediction document as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Prediction {
    /// Convert to the provider-neutral job snapshot
    pub fn into_job(self) -> Result<GenerationJob, UpstreamError> {
        let status = match self.status.as_str() {
            "starting" => JobStatus::Queued,
            "processing" => JobStatus::Running,
            "succeeded" => JobStatus::Succeeded,
            "failed" | "canceled" => JobStatus::Failed,
            other => {
                return Err(UpstreamError::Parse(format!(
                    "Unknown prediction status: {}",
                    other
                )))
            }
        };

        let result_reference = self.output.as_ref().and_then(output_reference);

        let error_detail = match self.error {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None if self.status == "canceled" => {
                Some("Prediction was canceled".to_string())
            }
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Ok(GenerationJob {
            external_id: self.id,
            status,
            result_reference,
            error_detail,
        })
    }
}

/// Output may be a single URL or a list of URLs; take the first
fn output_reference(output: &Value) -> Option<String> {
    match output {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

/// Replicate API client
pub struct ReplicateClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ReplicateClient {
    pub fn new(api_token: String) -> Result<Self, UpstreamError> {
        if !is_valid_key(&api_token) {
            return Err(UpstreamError::MissingCredential(REPLICATE_TOKEN_ENV));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: REPLICATE_BASE_URL.to_string(),
            api_token,
        })
    }

    /// Point at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn read_prediction(response: reqwest::Response) -> Result<GenerationJob, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let details = response.json::<Value>().await.ok();
            let message = details
                .as_ref()
                .and_then(|d| d["detail"].as_str().or_else(|| d["title"].as_str()))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        prediction.into_job()
    }
}

#[async_trait]
impl MediaJobProvider for ReplicateClient {
    fn provider_id(&self) -> &'static str {
        "Replicate"
    }

    async fn submit(&self, model: &str, input: &MusicInput) -> Result<GenerationJob, UpstreamError> {
        tracing::info!(model, input = %input.redacted(), "Sending prediction request");

        let response = self
            .http_client
            .post(format!("{}/models/{}/predictions", self.base_url, model))
            .bearer_auth(&self.api_token)
            .json(&PredictionRequest { input })
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let job = Self::read_prediction(response).await?;
        tracing::info!(prediction_id = %job.external_id, "Prediction created");
        Ok(job)
    }

    async fn fetch(&self, job_id: &str) -> Result<GenerationJob, UpstreamError> {
        let response = self
            .http_client
            .get(format!("{}/predictions/{}", self.base_url, job_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Self::read_prediction(response).await
    }
}

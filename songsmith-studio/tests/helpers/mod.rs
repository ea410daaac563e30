//! Shared test helpers: fake providers, multipart bodies, response decoding

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use songsmith_studio::error::UpstreamError;
use songsmith_studio::models::{GenerationJob, JobStatus, MusicInput};
use songsmith_studio::services::{CompletionProvider, MediaJobProvider};

pub const BOUNDARY: &str = "songsmith-test-boundary";

/// Completion provider returning a fixed reply
pub struct FakeCompletion {
    reply: Result<String, (u16, String)>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, message.to_string())),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    fn provider_id(&self) -> &'static str {
        "FakeCompletion"
    }

    async fn complete(&self, _model: &str, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(UpstreamError::Api {
                status: *status,
                message: message.clone(),
                details: None,
            }),
        }
    }
}

/// Media job provider replaying a status script; `Running` once exhausted
pub struct FakeJobs {
    statuses: Mutex<VecDeque<GenerationJob>>,
    pub submissions: Mutex<Vec<Value>>,
    pub fetches: Mutex<u32>,
}

impl FakeJobs {
    pub fn scripted(statuses: Vec<GenerationJob>) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.into()),
            submissions: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
        })
    }

    /// queued → running → succeeded with `track`
    pub fn succeeding(track: &str) -> Arc<Self> {
        Self::scripted(vec![
            GenerationJob::new("pred-1", JobStatus::Queued),
            GenerationJob::new("pred-1", JobStatus::Running),
            GenerationJob::new("pred-1", JobStatus::Succeeded).with_result(track),
        ])
    }

    /// running → failed with `detail`
    pub fn failing(detail: &str) -> Arc<Self> {
        Self::scripted(vec![
            GenerationJob::new("pred-1", JobStatus::Running),
            GenerationJob::new("pred-1", JobStatus::Failed).with_error(detail),
        ])
    }

    /// failed with `detail` on the first poll
    pub fn failing_at_once(detail: &str) -> Arc<Self> {
        Self::scripted(vec![
            GenerationJob::new("pred-1", JobStatus::Failed).with_error(detail)
        ])
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn fetch_count(&self) -> u32 {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl MediaJobProvider for FakeJobs {
    fn provider_id(&self) -> &'static str {
        "FakeJobs"
    }

    async fn submit(&self, _model: &str, input: &MusicInput) -> Result<GenerationJob, UpstreamError> {
        self.submissions
            .lock()
            .unwrap()
            .push(serde_json::to_value(input).unwrap());
        Ok(GenerationJob::new("pred-1", JobStatus::Queued))
    }

    async fn fetch(&self, job_id: &str) -> Result<GenerationJob, UpstreamError> {
        *self.fetches.lock().unwrap() += 1;
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| GenerationJob::new(job_id, JobStatus::Running)))
    }
}

/// One multipart part
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Files currently in `dir` (0 if it does not exist)
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Minimal WAV header, enough to exercise the upload path
pub fn wav_bytes() -> Vec<u8> {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&36u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes
}

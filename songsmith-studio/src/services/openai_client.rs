//! OpenAI chat-completions client
//!
//! One POST per call, no retries, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use songsmith_common::config::is_valid_key;
use std::time::Duration;

use super::providers::CompletionProvider;
use crate::error::UpstreamError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const USER_AGENT: &str = concat!("SongSmith/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credential environment variable
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI API client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self, UpstreamError> {
        if !is_valid_key(&api_key) {
            return Err(UpstreamError::MissingCredential(OPENAI_KEY_ENV));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Point at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// First choice's content, if the response carries any
fn first_choice(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn provider_id(&self) -> &'static str {
        "OpenAI"
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model, prompt_chars = prompt.len(), "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.json::<serde_json::Value>().await.ok();
            let message = details
                .as_ref()
                .and_then(|d| d["error"]["message"].as_str())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        tracing::info!(model, "Received chat completion");

        first_choice(chat).ok_or(UpstreamError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(OpenAiClient::new("sk-test".to_string()).is_ok());
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = OpenAiClient::new("  ".to_string());
        assert!(matches!(
            result,
            Err(UpstreamError::MissingCredential(OPENAI_KEY_ENV))
        ));
    }

    #[test]
    fn test_first_choice_extraction() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"[Verse]\nRain"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).as_deref(), Some("[Verse]\nRain"));
    }

    #[test]
    fn test_first_choice_missing() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_choice(response), None);

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice(response), None);
    }
}

//! Lyrics generation
//!
//! Builds one constrained prompt from a [`GenerationRequest`] and issues a
//! single completion call. The text is returned verbatim; the length limit
//! in the prompt is advisory and not enforced here.

use std::sync::Arc;

use super::providers::CompletionProvider;
use crate::error::UpstreamError;
use crate::models::{GenerationRequest, LyricsResult, LYRICS_LENGTH_BOUND};

/// Chat model used for lyrics
pub const LYRICS_MODEL: &str = "gpt-3.5-turbo";

/// Text-generation client for lyrics
pub struct LyricsGenerator {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl LyricsGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            model: LYRICS_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prompt embedding description, mood, genre and formatting rules
    pub fn build_prompt(request: &GenerationRequest) -> String {
        format!(
            "Create song lyrics based on this description: \"{}\" in a {} mood, {} genre.\n\
             Format the lyrics with proper sections (verse, chorus, etc.) using newlines and double newlines for pauses.\n\
             Keep the total length under {} characters.",
            request.description(),
            request.mood(),
            request.genre(),
            LYRICS_LENGTH_BOUND
        )
    }

    /// Generate lyrics with exactly one provider call
    ///
    /// Blank completions are reported as `UpstreamError::EmptyResponse`, so a
    /// success always carries text.
    pub async fn generate_lyrics(
        &self,
        request: &GenerationRequest,
    ) -> Result<LyricsResult, UpstreamError> {
        let prompt = Self::build_prompt(request);

        tracing::info!(
            provider = self.provider.provider_id(),
            mood = %request.mood(),
            genre = %request.genre(),
            "Generating lyrics"
        );

        let text = self.provider.complete(&self.model, &prompt).await.map_err(|e| {
            tracing::error!(provider = self.provider.provider_id(), error = %e, "Error generating lyrics");
            e
        })?;

        if text.trim().is_empty() {
            return Err(UpstreamError::EmptyResponse);
        }

        let lyrics = LyricsResult { text };
        if !lyrics.within_length_bound() {
            tracing::debug!(
                chars = lyrics.text.chars().count(),
                bound = LYRICS_LENGTH_BOUND,
                "Lyrics exceed advisory length bound"
            );
        }

        Ok(lyrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use songsmith_common::api::{Genre, Mood};
    use std::sync::Mutex;

    struct ScriptedCompletion {
        reply: Mutex<Option<Result<String, UpstreamError>>>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedCompletion {
        fn new(reply: Result<String, UpstreamError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        fn provider_id(&self) -> &'static str {
            "Scripted"
        }

        async fn complete(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(UpstreamError::EmptyResponse))
        }
    }

    fn rainy_request() -> GenerationRequest {
        GenerationRequest::new("a song about rainy Sunday mornings", Mood::Calm, Genre::Jazz)
            .unwrap()
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let prompt = LyricsGenerator::build_prompt(&rainy_request());
        assert!(prompt.contains("\"a song about rainy Sunday mornings\""));
        assert!(prompt.contains("in a calm mood, jazz genre"));
        assert!(prompt.contains("under 350 characters"));
    }

    #[tokio::test]
    async fn test_returns_text_verbatim_with_one_call() {
        let long = format!("[Verse]\n{}", "drip ".repeat(100));
        let provider = ScriptedCompletion::new(Ok(long.clone()));
        let generator = LyricsGenerator::new(provider.clone());

        let lyrics = generator.generate_lyrics(&rainy_request()).await.unwrap();

        // Not truncated to the advisory bound
        assert_eq!(lyrics.text, long);
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, LYRICS_MODEL);
    }

    #[tokio::test]
    async fn test_upstream_failure_not_retried() {
        let provider = ScriptedCompletion::new(Err(UpstreamError::Api {
            status: 429,
            message: "Rate limit reached".to_string(),
            details: None,
        }));
        let generator = LyricsGenerator::new(provider.clone());

        let err = generator.generate_lyrics(&rainy_request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Api { status: 429, .. }));
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_completion_is_upstream_error() {
        let provider = ScriptedCompletion::new(Ok("  \n ".to_string()));
        let generator = LyricsGenerator::new(provider).with_model("gpt-4o-mini");

        let err = generator.generate_lyrics(&rainy_request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::EmptyResponse));
    }
}

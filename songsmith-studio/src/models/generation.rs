//! Lyrics generation request and result

use serde::{Deserialize, Serialize};
use songsmith_common::api::{Genre, LyricsRequest, Mood};

use crate::error::ApiError;

/// Advisory upper bound on lyrics length (characters)
///
/// Stated in the prompt only. Completions longer than this are returned as-is.
pub const LYRICS_LENGTH_BOUND: usize = 350;

/// Validated lyrics request, immutable once built
///
/// Only constructible through [`GenerationRequest::new`], so a blank
/// description can never reach a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    description: String,
    mood: Mood,
    genre: Genre,
}

impl GenerationRequest {
    /// Build a request; the description must contain non-whitespace text
    pub fn new(description: impl Into<String>, mood: Mood, genre: Genre) -> Result<Self, ApiError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ApiError::Validation("Description is required".to_string()));
        }
        Ok(Self {
            description,
            mood,
            genre,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }
}

impl TryFrom<LyricsRequest> for GenerationRequest {
    type Error = ApiError;

    fn try_from(request: LyricsRequest) -> Result<Self, Self::Error> {
        Self::new(request.description, request.mood, request.genre)
    }
}

/// Lyrics exactly as returned by the text-generation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResult {
    pub text: String,
}

impl LyricsResult {
    /// Whether the provider honored the advisory length bound
    pub fn within_length_bound(&self) -> bool {
        self.text.chars().count() <= LYRICS_LENGTH_BOUND
    }
}

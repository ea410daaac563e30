//! Lyrics generation endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use songsmith_common::api::{LyricsRequest, LyricsResponse};

use crate::error::{ApiError, ApiResult, UpstreamError};
use crate::models::GenerationRequest;
use crate::services::OPENAI_KEY_ENV;
use crate::AppState;

/// POST /api/generate-lyrics
///
/// Body: `{description, mood?, genre?}`. Mood and genre default to
/// `neutral` / `any`.
pub async fn generate_lyrics(
    State(state): State<AppState>,
    payload: Result<Json<LyricsRequest>, JsonRejection>,
) -> ApiResult<Json<LyricsResponse>> {
    // Credential first, then input
    let generator = state
        .lyrics
        .as_ref()
        .ok_or(UpstreamError::MissingCredential(OPENAI_KEY_ENV))?;

    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let request = GenerationRequest::try_from(payload)?;

    let lyrics = generator.generate_lyrics(&request).await?;

    Ok(Json(LyricsResponse {
        success: true,
        lyrics: lyrics.text,
    }))
}

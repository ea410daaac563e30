//! Music generation endpoint
//!
//! Multipart form:
//! - `lyrics`: edited lyrics text
//! - `referenceSong`: MP3 or WAV reference track
//!
//! The file type is checked before anything reaches storage. Once stored, the
//! asset is owned by this request and released on every path.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use songsmith_common::api::{AudioMime, TrackResponse, LYRICS_FIELD, REFERENCE_FIELD};
use tracing::debug;

use crate::error::{ApiError, ApiResult, UpstreamError};
use crate::services::{release_logged, TransientAsset, TransientAssetStore, REPLICATE_TOKEN_ENV};
use crate::AppState;

const UNSUPPORTED_FILE: &str = "Only MP3 and WAV files are allowed";
const MISSING_LYRICS: &str = "Lyrics are required";
const MISSING_FILE: &str = "No file uploaded";

/// Parsed form; an unreleased asset is cleaned up when this is dropped
#[derive(Default)]
struct MusicForm {
    lyrics: Option<String>,
    asset: Option<TransientAsset>,
}

impl MusicForm {
    async fn release(self) {
        if let Some(asset) = self.asset {
            release_logged(asset).await;
        }
    }
}

async fn read_form(multipart: &mut Multipart, store: &TransientAssetStore) -> ApiResult<MusicForm> {
    let mut form = MusicForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(LYRICS_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read lyrics: {}", e)))?;
                form.lyrics = Some(text);
            }
            Some(REFERENCE_FIELD) => {
                let mime = field
                    .content_type()
                    .and_then(AudioMime::from_content_type)
                    .ok_or_else(|| ApiError::Validation(UNSUPPORTED_FILE.to_string()))?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read file chunk: {}", e)))?
                {
                    bytes.extend_from_slice(&chunk);
                }

                debug!(
                    file_name = field.file_name().unwrap_or("upload"),
                    mime = %mime,
                    size_bytes = bytes.len(),
                    "Received reference upload"
                );

                let asset = store.store(&bytes, mime).await?;
                // One reference per request; a repeated field replaces the earlier one
                if let Some(previous) = form.asset.replace(asset) {
                    release_logged(previous).await;
                }
            }
            other => {
                debug!(field = other.unwrap_or("unnamed"), "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

/// POST /api/generate-music
pub async fn generate_music(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<TrackResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;
    let form = read_form(&mut multipart, &state.assets).await?;

    let Some(orchestrator) = state.music.clone() else {
        form.release().await;
        return Err(UpstreamError::MissingCredential(REPLICATE_TOKEN_ENV).into());
    };

    let MusicForm { lyrics, asset } = form;

    let Some(lyrics) = lyrics.filter(|text| !text.trim().is_empty()) else {
        if let Some(asset) = asset {
            release_logged(asset).await;
        }
        return Err(ApiError::Validation(MISSING_LYRICS.to_string()));
    };

    let Some(asset) = asset else {
        return Err(ApiError::Validation(MISSING_FILE.to_string()));
    };

    let track = orchestrator
        .generate(&lyrics, asset, &state.shutdown)
        .await?;

    Ok(Json(TrackResponse {
        success: true,
        track: track.into_inner(),
    }))
}

//! songsmith-studio library interface
//!
//! Exposes the router and state so integration tests can drive the service
//! with fake providers.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use songsmith_common::config::RootFolderInitializer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::StudioConfig;
use crate::error::UpstreamError;
use crate::services::{
    LyricsGenerator, MusicOrchestrator, OpenAiClient, ReplicateClient, TransientAssetStore,
};

/// Largest accepted request body (reference uploads)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when the text-generation credential is absent
    pub lyrics: Option<Arc<LyricsGenerator>>,
    /// `None` when the media-generation credential is absent
    pub music: Option<Arc<MusicOrchestrator>>,
    pub assets: TransientAssetStore,
    /// Cancelled on shutdown; in-flight polls stop waiting
    pub shutdown: CancellationToken,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(assets: TransientAssetStore) -> Self {
        Self {
            lyrics: None,
            music: None,
            assets,
            shutdown: CancellationToken::new(),
            startup_time: Utc::now(),
        }
    }

    pub fn with_lyrics(mut self, generator: LyricsGenerator) -> Self {
        self.lyrics = Some(Arc::new(generator));
        self
    }

    pub fn with_music(mut self, orchestrator: MusicOrchestrator) -> Self {
        self.music = Some(Arc::new(orchestrator));
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Build production state: real provider clients for each present credential
    pub fn from_config(config: &StudioConfig) -> Result<Self, UpstreamError> {
        let uploads = RootFolderInitializer::new(config.root_folder.clone()).uploads_path();
        let mut state = Self::new(TransientAssetStore::new(uploads));

        if let Some(key) = &config.openai_api_key {
            let client = OpenAiClient::new(key.clone())?;
            state = state.with_lyrics(LyricsGenerator::new(Arc::new(client)));
        }

        if let Some(token) = &config.replicate_api_token {
            let client = ReplicateClient::new(token.clone())?;
            state = state.with_music(MusicOrchestrator::new(Arc::new(client)));
        }

        Ok(state)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::generation_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

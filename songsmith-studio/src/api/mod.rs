//! HTTP API handlers for songsmith-studio

pub mod health;
pub mod lyrics;
pub mod music;

pub use health::health_routes;

use axum::{routing::post, Router};

use crate::AppState;

/// Build generation routes
pub fn generation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/generate-lyrics", post(lyrics::generate_lyrics))
        .route("/api/generate-music", post(music::generate_music))
}

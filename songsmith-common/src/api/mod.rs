//! API module for types shared by the studio service and its clients
//!
//! Contains ONLY plain serializable types and pure helpers; each crate wraps
//! them with its own HTTP framework (axum on the server, reqwest on the client).

pub mod types;

pub use types::{
    AudioMime, ErrorResponse, Genre, LyricsRequest, LyricsResponse, Mood, TrackResponse,
    LYRICS_FIELD, REFERENCE_FIELD,
};

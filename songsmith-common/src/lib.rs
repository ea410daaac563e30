//! # SongSmith Common Library
//!
//! Shared code for the SongSmith studio service and its wizard client:
//! - Error type shared by configuration loading
//! - Configuration loading (TOML + environment) and root folder resolution
//! - API request/response types (`Mood`, `Genre`, `AudioMime`, envelopes)

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};

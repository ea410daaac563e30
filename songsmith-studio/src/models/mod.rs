//! Data models for songsmith-studio
//!
//! - Lyrics request/result
//! - Generation job state as reported by the media provider
//! - Fixed synthesis parameters sent with every job

pub mod generation;
pub mod job;
pub mod synthesis;

pub use generation::{GenerationRequest, LyricsResult, LYRICS_LENGTH_BOUND};
pub use job::{CompletedJob, GenerationJob, JobStatus, TrackReference};
pub use synthesis::{MusicInput, SynthesisParameters};

//! Generation services
//!
//! Provider clients sit behind [`CompletionProvider`] / [`MediaJobProvider`];
//! everything above them is provider-neutral.

pub mod job_poller;
pub mod lyrics_generator;
pub mod music_orchestrator;
pub mod openai_client;
pub mod providers;
pub mod replicate_client;
pub mod transient_asset;

pub use job_poller::{JobPoller, PollError, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
pub use lyrics_generator::{LyricsGenerator, LYRICS_MODEL};
pub use music_orchestrator::{GenerationError, MusicOrchestrator, MUSIC_MODEL};
pub use openai_client::{OpenAiClient, OPENAI_KEY_ENV};
pub use providers::{CompletionProvider, MediaJobProvider};
pub use replicate_client::{ReplicateClient, REPLICATE_TOKEN_ENV};
pub use transient_asset::{release_logged, TransientAsset, TransientAssetStore};

//! songsmith-ui library interface
//!
//! The wizard state machine and the HTTP client it drives.

pub mod client;
pub mod wizard;

pub use client::{BackendError, HttpStudioClient, StudioBackend, DEFAULT_SERVER_URL};
pub use wizard::{ReferenceFile, Stage, WizardError, WizardSession};

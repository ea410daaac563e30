//! Song creation wizard
//!
//! A single tagged stage plus guarded transitions:
//!
//! | From            | Guard                          | Effect                                 |
//! |-----------------|--------------------------------|----------------------------------------|
//! | DescribeIntent  | description non-empty          | lyrics call; → EditLyrics              |
//! | EditLyrics      | edited lyrics non-empty        | → UploadReference (local)              |
//! | UploadReference | reference selected, lyrics set | music call; → Result                   |
//! | Result          | -                              | only `go_back` / `reset`               |
//!
//! A failed guard or backend call leaves the stage unchanged and records
//! `error_message`; any successful transition clears it.

use songsmith_common::api::{AudioMime, Genre, LyricsRequest, Mood};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{BackendError, StudioBackend};

const NEED_DESCRIPTION: &str = "Please enter a description";
const NEED_LYRICS: &str = "Please enter lyrics";
const NEED_REFERENCE: &str = "Please select a file first";
const UNSUPPORTED_FILE: &str = "Only MP3 and WAV files are allowed";

/// Wizard stage, in workflow order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    DescribeIntent,
    EditLyrics,
    UploadReference,
    Result,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::DescribeIntent,
        Stage::EditLyrics,
        Stage::UploadReference,
        Stage::Result,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::DescribeIntent => "Generate Lyrics",
            Stage::EditLyrics => "Edit Lyrics",
            Stage::UploadReference => "Upload Reference Song",
            Stage::Result => "Generate Music",
        }
    }

    fn previous(&self) -> Option<Stage> {
        match self {
            Stage::DescribeIntent => None,
            Stage::EditLyrics => Some(Stage::DescribeIntent),
            Stage::UploadReference => Some(Stage::EditLyrics),
            Stage::Result => Some(Stage::UploadReference),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Wizard errors
#[derive(Debug, Error)]
pub enum WizardError {
    /// Transition guard not met
    #[error("{0}")]
    Guard(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Cannot skip ahead from {from} to {to}")]
    ForwardSkip { from: Stage, to: Stage },

    #[error("Already at the first step")]
    AtStart,

    #[error("Song is complete; reset to start over")]
    Finished,

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reference track chosen by the user, with an accepted type
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    file_name: String,
    mime: AudioMime,
    bytes: Vec<u8>,
}

impl fmt::Debug for ReferenceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

impl ReferenceFile {
    /// Accepts only `audio/mpeg` and `audio/wav`
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, WizardError> {
        let mime = AudioMime::from_content_type(content_type)
            .ok_or(WizardError::Guard(UNSUPPORTED_FILE))?;
        Ok(Self {
            file_name: file_name.into(),
            mime,
            bytes,
        })
    }

    /// Load from disk, typing the file by extension
    pub async fn from_path(path: &Path) -> Result<Self, WizardError> {
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioMime::from_extension)
            .ok_or(WizardError::Guard(UNSUPPORTED_FILE))?;

        let bytes = tokio::fs::read(path).await.map_err(|source| WizardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("reference.{}", mime.extension()));

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> AudioMime {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One user's pass through the wizard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardSession {
    stage: Stage,
    description: String,
    mood: Mood,
    genre: Genre,
    /// As returned by the backend; never edited
    lyrics_text: String,
    edited_lyrics_text: String,
    reference: Option<ReferenceFile>,
    result_reference: Option<String>,
    error_message: Option<String>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
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

    pub fn lyrics_text(&self) -> &str {
        &self.lyrics_text
    }

    pub fn edited_lyrics_text(&self) -> &str {
        &self.edited_lyrics_text
    }

    pub fn reference(&self) -> Option<&ReferenceFile> {
        self.reference.as_ref()
    }

    pub fn result_reference(&self) -> Option<&str> {
        self.result_reference.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.genre = genre;
    }

    /// Replace the editable copy; the generated text is untouched
    pub fn edit_lyrics(&mut self, text: impl Into<String>) {
        self.edited_lyrics_text = text.into();
    }

    /// Choose the reference track; clears any earlier error
    pub fn select_reference(&mut self, reference: ReferenceFile) {
        self.reference = Some(reference);
        self.error_message = None;
    }

    /// Attempt the forward transition out of the current stage
    ///
    /// On failure the stage is unchanged and the error is also recorded in
    /// `error_message`.
    pub async fn advance<B>(&mut self, backend: &B) -> Result<Stage, WizardError>
    where
        B: StudioBackend + ?Sized,
    {
        let outcome = match self.stage {
            Stage::DescribeIntent => self.request_lyrics(backend).await,
            Stage::EditLyrics => self.confirm_lyrics(),
            Stage::UploadReference => self.request_track(backend).await,
            Stage::Result => Err(WizardError::Finished),
        };

        match outcome {
            Ok(next) => {
                info!(from = %self.stage, to = %next, "Wizard advanced");
                self.stage = next;
                self.error_message = None;
                Ok(next)
            }
            Err(e) => {
                warn!(stage = %self.stage, error = %e, "Wizard transition failed");
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn request_lyrics<B>(&mut self, backend: &B) -> Result<Stage, WizardError>
    where
        B: StudioBackend + ?Sized,
    {
        if self.description.trim().is_empty() {
            return Err(WizardError::Guard(NEED_DESCRIPTION));
        }

        let request = LyricsRequest {
            description: self.description.clone(),
            mood: self.mood,
            genre: self.genre,
        };
        let lyrics = backend.generate_lyrics(&request).await?;

        self.edited_lyrics_text = lyrics.clone();
        self.lyrics_text = lyrics;
        Ok(Stage::EditLyrics)
    }

    fn confirm_lyrics(&self) -> Result<Stage, WizardError> {
        if self.edited_lyrics_text.trim().is_empty() {
            return Err(WizardError::Guard(NEED_LYRICS));
        }
        Ok(Stage::UploadReference)
    }

    async fn request_track<B>(&mut self, backend: &B) -> Result<Stage, WizardError>
    where
        B: StudioBackend + ?Sized,
    {
        let reference = self
            .reference
            .as_ref()
            .ok_or(WizardError::Guard(NEED_REFERENCE))?;
        if self.edited_lyrics_text.trim().is_empty() {
            return Err(WizardError::Guard(NEED_LYRICS));
        }

        let track = backend
            .generate_music(&self.edited_lyrics_text, reference)
            .await?;

        self.result_reference = Some(track);
        Ok(Stage::Result)
    }

    /// Step back one stage
    pub fn go_back(&mut self) -> Result<Stage, WizardError> {
        let previous = self.stage.previous().ok_or(WizardError::AtStart)?;
        self.stage = previous;
        self.error_message = None;
        Ok(previous)
    }

    /// Jump to an earlier (or the current) stage; never forward
    pub fn go_to(&mut self, stage: Stage) -> Result<Stage, WizardError> {
        if stage > self.stage {
            return Err(WizardError::ForwardSkip {
                from: self.stage,
                to: stage,
            });
        }
        self.stage = stage;
        self.error_message = None;
        Ok(stage)
    }

    /// Clear everything and return to the first stage
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::DescribeIntent < Stage::EditLyrics);
        assert!(Stage::UploadReference < Stage::Result);
        assert_eq!(Stage::ALL[3].title(), "Generate Music");
    }

    #[test]
    fn test_reference_type_checked() {
        assert!(ReferenceFile::new("a.mp3", "audio/mpeg", vec![1]).is_ok());
        assert!(ReferenceFile::new("a.wav", "audio/wav", vec![1]).is_ok());

        let err = ReferenceFile::new("a.flac", "audio/flac", vec![1]).unwrap_err();
        assert_eq!(err.to_string(), "Only MP3 and WAV files are allowed");
    }

    #[test]
    fn test_go_to_rejects_forward_skip() {
        let mut session = WizardSession::new();
        let err = session.go_to(Stage::UploadReference).unwrap_err();
        assert!(matches!(
            err,
            WizardError::ForwardSkip {
                from: Stage::DescribeIntent,
                to: Stage::UploadReference
            }
        ));
        assert_eq!(session.stage(), Stage::DescribeIntent);
    }

    #[test]
    fn test_go_back_at_start() {
        let mut session = WizardSession::new();
        assert!(matches!(session.go_back(), Err(WizardError::AtStart)));
    }

    #[tokio::test]
    async fn test_reference_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("demo.WAV");
        std::fs::write(&path, b"RIFF").unwrap();

        let reference = ReferenceFile::from_path(&path).await.unwrap();
        assert_eq!(reference.mime(), AudioMime::Wav);
        assert_eq!(reference.file_name(), "demo.WAV");
        assert_eq!(reference.bytes(), b"RIFF");

        let ogg = dir.path().join("demo.ogg");
        std::fs::write(&ogg, b"OggS").unwrap();
        assert!(matches!(
            ReferenceFile::from_path(&ogg).await,
            Err(WizardError::Guard(_))
        ));
    }
}

//! Shared API request/response types
//!
//! Used by:
//! - songsmith-studio (serves `/api/generate-lyrics` and `/api/generate-music`)
//! - songsmith-ui (wizard client calling those endpoints)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Multipart field carrying the reference audio file
pub const REFERENCE_FIELD: &str = "referenceSong";

/// Multipart field carrying the edited lyrics
pub const LYRICS_FIELD: &str = "lyrics";

// ========================================
// Enumerated form inputs
// ========================================

/// Mood of the requested song
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Sad,
    Energetic,
    Calm,
    Angry,
    Romantic,
    Mysterious,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Neutral,
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Angry,
        Mood::Romantic,
        Mood::Mysterious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Angry => "angry",
            Mood::Romantic => "romantic",
            Mood::Mysterious => "mysterious",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown mood: {}", s)))
    }
}

/// Genre of the requested song
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    #[default]
    Any,
    Pop,
    Rock,
    Jazz,
    Classical,
    Electronic,
    #[serde(rename = "hip hop")]
    HipHop,
    Folk,
    Country,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Any,
        Genre::Pop,
        Genre::Rock,
        Genre::Jazz,
        Genre::Classical,
        Genre::Electronic,
        Genre::HipHop,
        Genre::Folk,
        Genre::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Any => "any",
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::Jazz => "jazz",
            Genre::Classical => "classical",
            Genre::Electronic => "electronic",
            Genre::HipHop => "hip hop",
            Genre::Folk => "folk",
            Genre::Country => "country",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "hip-hop" / "hip_hop" from command lines
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown genre: {}", s)))
    }
}

// ========================================
// Reference audio
// ========================================

/// Accepted reference-audio mimetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioMime {
    #[serde(rename = "audio/mpeg")]
    Mpeg,
    #[serde(rename = "audio/wav")]
    Wav,
}

impl AudioMime {
    /// Match a `Content-Type` value; parameters (`; charset=...`) are ignored
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "audio/mpeg" => Some(AudioMime::Mpeg),
            "audio/wav" => Some(AudioMime::Wav),
            _ => None,
        }
    }

    /// Guess from a file extension (client side, before upload)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioMime::Mpeg),
            "wav" => Some(AudioMime::Wav),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMime::Mpeg => "audio/mpeg",
            AudioMime::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioMime::Mpeg => "mp3",
            AudioMime::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// Request / response envelopes
// ========================================

/// POST /api/generate-lyrics request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub genre: Genre,
}

/// POST /api/generate-lyrics success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsResponse {
    pub success: bool,
    pub lyrics: String,
}

/// POST /api/generate-music success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
    pub track: String,
}

/// Uniform failure envelope for every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Opaque upstream diagnostic, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

//! Music synthesis request parameters
//!
//! The parameters are policy constants and are not exposed to callers.

use serde::Serialize;

/// Fixed synthesis knobs sent with every generation job
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynthesisParameters {
    /// Track length (seconds)
    pub duration: u32,
    pub sample_rate: u32,
    pub bitrate: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub classifier_free_guidance: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl SynthesisParameters {
    pub const POLICY: SynthesisParameters = SynthesisParameters {
        duration: 30,
        sample_rate: 44_100,
        bitrate: 256_000,
        temperature: 0.8,
        top_k: 250,
        top_p: 0.95,
        classifier_free_guidance: 3,
        num_inference_steps: 50,
        guidance_scale: 7.5,
    };
}

impl Default for SynthesisParameters {
    fn default() -> Self {
        Self::POLICY
    }
}

/// Input document for one generation job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicInput {
    pub lyrics: String,
    /// Reference audio as a `data:` URI
    pub song_file: String,
    #[serde(flatten)]
    pub parameters: SynthesisParameters,
}

impl MusicInput {
    /// Same document with the embedded audio elided, for logging
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(song_file) = value.get_mut("song_file") {
            *song_file = serde_json::Value::String(format!("[{} characters]", self.song_file.len()));
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_flattens_parameters() {
        let input = MusicInput {
            lyrics: "la la".to_string(),
            song_file: "data:audio/wav;base64,AAAA".to_string(),
            parameters: SynthesisParameters::POLICY,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["duration"], 30);
        assert_eq!(json["sample_rate"], 44_100);
        assert_eq!(json["bitrate"], 256_000);
        assert_eq!(json["top_k"], 250);
        assert_eq!(json["lyrics"], "la la");
    }

    #[test]
    fn test_redacted_hides_audio() {
        let input = MusicInput {
            lyrics: "la".to_string(),
            song_file: "data:audio/wav;base64,AAAA".to_string(),
            parameters: SynthesisParameters::default(),
        };
        let redacted = input.redacted();
        assert_eq!(redacted["song_file"], "[26 characters]");
    }
}

use serde::{Deserialize, Serialize};

use super::backend::Modality;

/// Picks the recorder encoding from an ordered preference list
///
/// Pure and infallible: when the runtime supports none of the candidates
/// the fixed fallback is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecNegotiator {
    /// Candidate mime types, most preferred first
    pub preferred: Vec<String>,
    /// Returned when nothing in `preferred` is supported
    pub fallback: String,
}

impl CodecNegotiator {
    pub fn new(preferred: Vec<String>, fallback: impl Into<String>) -> Self {
        Self {
            preferred,
            fallback: fallback.into(),
        }
    }

    /// Browser-recorder order for audio answers
    pub fn audio() -> Self {
        Self::new(
            vec![
                "audio/webm;codecs=opus".to_string(),
                "audio/webm".to_string(),
                "audio/mp4".to_string(),
                "audio/wav".to_string(),
            ],
            "audio/webm",
        )
    }

    pub fn video() -> Self {
        Self::new(
            vec![
                "video/webm;codecs=vp9,opus".to_string(),
                "video/webm;codecs=vp8,opus".to_string(),
                "video/webm".to_string(),
                "video/mp4".to_string(),
            ],
            "video/webm",
        )
    }

    pub fn for_modality(modality: Modality) -> Self {
        match modality {
            Modality::Audio => Self::audio(),
            Modality::Video => Self::video(),
        }
    }

    /// First preferred type accepted by `is_supported`, else the fallback
    pub fn negotiate<F>(&self, is_supported: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        self.preferred
            .iter()
            .find(|candidate| is_supported(candidate.as_str()))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// File extension for a mime type, ignoring codec parameters
pub fn extension_for(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence {
        "audio/webm" | "video/webm" => "webm",
        "audio/mp4" => "m4a",
        "video/mp4" => "mp4",
        "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        "audio/mpeg" => "mp3",
        "audio/flac" => "flac",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Mime type guessed from a file name's extension
pub fn mime_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::capture::{CodecNegotiator, Modality};
use crate::coordinator::{CoordinatorConfig, ExclusionPolicy};
use crate::session::SessionConfig;

/// Prefix of environment overrides, e.g. `QUESTION_CAPTURE__SERVICE__HTTP__PORT`
pub const ENV_PREFIX: &str = "QUESTION_CAPTURE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub codecs: CodecsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "question-capture".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3900,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Number of questions a complete set covers
    pub question_count: usize,
    pub audio_exclusion: ExclusionPolicy,
    pub video_exclusion: ExclusionPolicy,
    /// Elapsed-time tick period
    pub tick_interval_ms: u64,
    /// How often the file device emits a chunk
    pub chunk_interval_ms: u64,
    /// Stop sessions automatically after this long; unset means no cap
    pub max_duration_secs: Option<u64>,
    /// Buffered events per subscriber before it starts lagging
    pub event_capacity: usize,
    /// WAV file replayed by the capture device
    pub wav_path: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            audio_exclusion: ExclusionPolicy::SingleFlight,
            video_exclusion: ExclusionPolicy::SingleFlight,
            tick_interval_ms: 1000,
            chunk_interval_ms: 1000,
            max_duration_secs: None,
            event_capacity: 256,
            wav_path: PathBuf::from("fixtures/answer.wav"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodecsConfig {
    pub audio: CodecNegotiator,
    pub video: CodecNegotiator,
}

impl Default for CodecsConfig {
    fn default() -> Self {
        Self {
            audio: CodecNegotiator::audio(),
            video: CodecNegotiator::video(),
        }
    }
}

impl Config {
    /// Load `path` (extension optional, file optional) layered with
    /// `QUESTION_CAPTURE__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn chunk_interval(&self) -> Duration {
        Duration::from_millis(self.capture.chunk_interval_ms)
    }

    /// Coordinator settings for one modality
    pub fn coordinator_config(&self, modality: Modality) -> CoordinatorConfig {
        let (exclusion, codecs) = match modality {
            Modality::Audio => (self.capture.audio_exclusion, self.codecs.audio.clone()),
            Modality::Video => (self.capture.video_exclusion, self.codecs.video.clone()),
        };

        let session = SessionConfig {
            tick_interval: Duration::from_millis(self.capture.tick_interval_ms.max(1)),
            max_duration: self.capture.max_duration_secs.map(Duration::from_secs),
        };

        CoordinatorConfig::new(modality, self.capture.question_count)
            .with_exclusion(exclusion)
            .with_codecs(codecs)
            .with_session(session)
    }
}

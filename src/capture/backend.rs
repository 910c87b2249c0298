use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::error::CaptureError;

/// Recording modality handled by one coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Microphone only
    Audio,
    /// Camera plus microphone
    Video,
}

impl Modality {
    /// Stream kind requested from the device for this modality
    pub fn capture_kind(self) -> CaptureKind {
        match self {
            Modality::Audio => CaptureKind::Audio,
            Modality::Video => CaptureKind::AudioVideo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Audio => "audio",
            Modality::Video => "video",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of hardware stream to acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    Audio,
    AudioVideo,
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKind::Audio => f.write_str("audio"),
            CaptureKind::AudioVideo => f.write_str("audio+video"),
        }
    }
}

/// One fragment of encoded capture data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Encoded bytes, only playable once concatenated with the other chunks
    pub data: Vec<u8>,
    /// Milliseconds since the recorder started
    pub timestamp_ms: u64,
}

impl Chunk {
    pub fn new(data: Vec<u8>, timestamp_ms: u64) -> Self {
        Self { data, timestamp_ms }
    }
}

/// Media capture backend
///
/// Platform-specific implementations wrap whatever the host offers
/// (a browser media API, a native audio stack, a camera SDK). The
/// coordinator only ever talks to this trait.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Whether the recorder can encode to `mime_type`
    fn is_type_supported(&self, mime_type: &str) -> bool;

    /// Acquire a live stream
    ///
    /// May suspend indefinitely while the platform waits for user consent.
    async fn acquire(&self, kind: CaptureKind) -> Result<Box<dyn DeviceStream>, CaptureError>;
}

/// A live device stream plus its encoder
///
/// Owned exclusively by one capture session.
#[async_trait::async_trait]
pub trait DeviceStream: Send {
    /// Stable identifier for logging
    fn id(&self) -> &str;

    fn kind(&self) -> CaptureKind;

    /// Start encoding with `mime_type`
    ///
    /// Returns the receiver chunks are delivered on, in emission order.
    /// The channel closes once the recorder has been finalized.
    async fn start_recorder(&mut self, mime_type: &str) -> Result<mpsc::Receiver<Chunk>, CaptureError>;

    /// Ask the recorder to flush pending data and close its chunk channel
    async fn finalize(&mut self) -> Result<(), CaptureError>;

    /// Stop every track and let go of the hardware
    fn release(&mut self);

    /// Whether any track is still open
    fn is_live(&self) -> bool;
}

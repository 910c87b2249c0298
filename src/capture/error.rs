use thiserror::Error;

use super::backend::{CaptureKind, Modality};

/// Errors raised at the device capture seam.
///
/// The coordinator converts every one of these into a `recordingError`
/// signal; none of them escape past its boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user (or platform policy) refused access to the device.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No device is present or it could not be opened.
    #[error("device not available: {0}")]
    DeviceNotAvailable(String),

    /// The backend cannot produce this kind of stream.
    #[error("unsupported capture kind: {0}")]
    UnsupportedKind(CaptureKind),

    /// The encoder failed to start or finalize.
    #[error("recorder failed: {0}")]
    RecorderFailed(String),

    /// Stop was requested but the recorder never produced a chunk.
    #[error("No {0} data recorded")]
    EmptyCapture(Modality),
}

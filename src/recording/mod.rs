//! Finalized recordings and the per-question registry
//!
//! - `Recording` / `MediaBlob`: immutable artifacts for one question
//! - `RecordingRegistry`: question index → recording, plus completeness queries
//! - `export`: packaging of the registry for an outbound multipart request

pub mod export;
mod recording;
mod registry;

pub use export::{Attachment, ExportManifest, ManifestEntry};
pub use recording::{format_size, MediaBlob, Recording, RecordingSummary, SourceKind, UploadedFile};
pub use registry::RecordingRegistry;

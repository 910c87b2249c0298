use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::capture::codec::mime_for_file_name;
use crate::capture::probe::probe_duration_ms;

/// Where a recording came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Assembled from a live capture session
    Captured,
    /// Supplied as a pre-existing file
    Uploaded,
}

/// Opaque media payload with its mime type
///
/// Cheap to clone; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl MediaBlob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

// Signals and status payloads describe the blob; bytes only travel through export.
impl Serialize for MediaBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MediaBlob", 2)?;
        state.serialize_field("mimeType", &self.mime_type)?;
        state.serialize_field("sizeBytes", &self.size_bytes())?;
        state.end()
    }
}

/// A file handed to the coordinator instead of a live capture
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Arc<[u8]>,
    /// Declared content type, if the caller knows it
    pub content_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// The finalized artifact for one question
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub question_index: usize,
    pub media: MediaBlob,
    /// Capture length; for uploads only known when the container says so
    pub duration_ms: Option<u64>,
    pub size_bytes: u64,
    pub source_kind: SourceKind,
    /// Original name of an uploaded file
    pub file_name: Option<String>,
    /// Capture session that produced this recording
    pub session_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Recording {
    pub fn captured(
        question_index: usize,
        media: MediaBlob,
        duration_ms: u64,
        session_id: Uuid,
    ) -> Self {
        Self {
            question_index,
            size_bytes: media.size_bytes(),
            media,
            duration_ms: Some(duration_ms),
            source_kind: SourceKind::Captured,
            file_name: None,
            session_id: Some(session_id),
            created_at: Utc::now(),
        }
    }

    /// Build an uploaded recording purely from the file
    pub fn uploaded(question_index: usize, file: UploadedFile) -> Self {
        let mime_type = file
            .content_type
            .filter(|content_type| !content_type.trim().is_empty())
            .unwrap_or_else(|| mime_for_file_name(&file.name).to_string());
        let duration_ms = probe_duration_ms(Arc::clone(&file.data), &file.name);
        let media = MediaBlob::new(file.data, mime_type);

        Self {
            question_index,
            size_bytes: media.size_bytes(),
            media,
            duration_ms,
            source_kind: SourceKind::Uploaded,
            file_name: Some(file.name),
            session_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> RecordingSummary {
        RecordingSummary {
            question_index: self.question_index,
            mime_type: self.media.mime_type().to_string(),
            size_bytes: self.size_bytes,
            duration_ms: self.duration_ms,
            source_kind: self.source_kind,
            file_name: self.file_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Human-readable size for the per-question info text (`1.5 KB`)
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Serializable description of a recording, without its bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSummary {
    pub question_index: usize,
    pub mime_type: String,
    pub size_bytes: u64,
    pub duration_ms: Option<u64>,
    pub source_kind: SourceKind,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

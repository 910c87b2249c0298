// Outbound packaging of completed recordings
//
// Produces one attachment per question, named the way the analysis
// endpoint expects (`audio_<i>` / `video_<i>` fields). Sending them is
// left to the caller.

use base64::Engine;
use serde::Serialize;

use super::recording::{MediaBlob, SourceKind};
use super::registry::RecordingRegistry;
use crate::capture::codec::extension_for;
use crate::capture::Modality;

/// One multipart attachment
#[derive(Debug, Clone)]
pub struct Attachment {
    pub question_index: usize,
    /// Form field name, e.g. `audio_0`
    pub field_name: String,
    pub file_name: String,
    pub media: MediaBlob,
}

/// Attachments for every recording in `registry`, ordered by index
pub fn attachments(modality: Modality, registry: &RecordingRegistry) -> Vec<Attachment> {
    registry
        .all_recordings()
        .into_iter()
        .map(|(question_index, recording)| {
            let file_name = match (&recording.source_kind, &recording.file_name) {
                (SourceKind::Uploaded, Some(name)) => name.clone(),
                _ => format!(
                    "question_{}.{}",
                    question_index,
                    extension_for(recording.media.mime_type())
                ),
            };

            Attachment {
                question_index,
                field_name: format!("{}_{}", modality, question_index),
                file_name,
                media: recording.media.clone(),
            }
        })
        .collect()
}

/// JSON form of the export, payloads base64-encoded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub modality: Modality,
    pub question_count: usize,
    pub complete: bool,
    pub attachments: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub question_index: usize,
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub duration_ms: Option<u64>,
    pub source_kind: SourceKind,
    pub data_base64: String,
}

impl ExportManifest {
    pub fn build(modality: Modality, question_count: usize, registry: &RecordingRegistry) -> Self {
        let attachments = attachments(modality, registry)
            .into_iter()
            .filter_map(|attachment| {
                let recording = registry.get(attachment.question_index)?;
                Some(ManifestEntry {
                    question_index: attachment.question_index,
                    field_name: attachment.field_name,
                    file_name: attachment.file_name,
                    mime_type: attachment.media.mime_type().to_string(),
                    size_bytes: attachment.media.size_bytes(),
                    duration_ms: recording.duration_ms,
                    source_kind: recording.source_kind,
                    data_base64: base64::engine::general_purpose::STANDARD
                        .encode(attachment.media.bytes()),
                })
            })
            .collect();

        Self {
            modality,
            question_count,
            complete: registry.has_all(question_count),
            attachments,
        }
    }
}

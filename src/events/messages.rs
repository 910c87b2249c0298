use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::coordinator::CoordinatorStatus;
use crate::recording::{ExportManifest, MediaBlob, UploadedFile};

/// Conceptual per-question state the UI renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionState {
    Ready,
    Recording,
    Recorded,
}

/// Signals published by the coordinator
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RecordingEvent {
    #[serde(rename_all = "camelCase")]
    RecordingStarted { question_index: usize },

    #[serde(rename_all = "camelCase")]
    RecordingCompleted {
        question_index: usize,
        media_blob: MediaBlob,
        duration_ms: u64,
    },

    #[serde(rename_all = "camelCase")]
    RecordingError { question_index: usize, error: String },

    /// Elapsed time of a live session, once per timer tick
    #[serde(rename_all = "camelCase")]
    RecordingTick { question_index: usize, elapsed_ms: u64 },

    #[serde(rename_all = "camelCase")]
    StateChanged {
        question_index: usize,
        state: QuestionState,
    },

    /// Every recording was discarded
    Cleared,
}

impl RecordingEvent {
    /// Wire name of the signal
    pub fn signal_name(&self) -> &'static str {
        match self {
            RecordingEvent::RecordingStarted { .. } => "recordingStarted",
            RecordingEvent::RecordingCompleted { .. } => "recordingCompleted",
            RecordingEvent::RecordingError { .. } => "recordingError",
            RecordingEvent::RecordingTick { .. } => "recordingTick",
            RecordingEvent::StateChanged { .. } => "stateChanged",
            RecordingEvent::Cleared => "cleared",
        }
    }

    pub fn question_index(&self) -> Option<usize> {
        match self {
            RecordingEvent::RecordingStarted { question_index }
            | RecordingEvent::RecordingCompleted { question_index, .. }
            | RecordingEvent::RecordingError { question_index, .. }
            | RecordingEvent::RecordingTick { question_index, .. }
            | RecordingEvent::StateChanged { question_index, .. } => Some(*question_index),
            RecordingEvent::Cleared => None,
        }
    }
}

/// Signals consumed by the coordinator's event loop
#[derive(Debug)]
pub enum Command {
    Start { question_index: usize },
    Stop { question_index: usize },
    Upload { question_index: usize, file: UploadedFile },
    Clear,
    Status { reply: oneshot::Sender<CoordinatorStatus> },
    Export { reply: oneshot::Sender<ExportManifest> },
}

impl Command {
    /// Wire name of the signal
    pub fn signal_name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "questionRecording:start",
            Command::Stop { .. } => "questionRecording:stop",
            Command::Upload { .. } => "questionRecording:upload",
            Command::Clear => "questionRecording:clear",
            Command::Status { .. } => "questionRecording:status",
            Command::Export { .. } => "questionRecording:export",
        }
    }
}

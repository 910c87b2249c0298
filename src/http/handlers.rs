use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::state::AppState;
use crate::capture::Modality;
use crate::events::RecordingEvent;
use crate::recording::UploadedFile;

/// Header carrying the original name of an uploaded file
pub const FILE_NAME_HEADER: &str = "x-file-name";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedResponse {
    pub modality: Modality,
    pub question_index: Option<usize>,
    pub signal: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Event as streamed to subscribers, tagged with its coordinator
#[derive(Debug, Serialize)]
pub struct SseSignal {
    pub modality: Modality,
    #[serde(flatten)]
    pub event: RecordingEvent,
}

fn accepted(modality: Modality, question_index: Option<usize>, signal: &'static str) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            modality,
            question_index,
            signal,
        }),
    )
        .into_response()
}

fn failure(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /:modality/questions/:index/start
pub async fn start_recording(
    State(state): State<AppState>,
    Path((modality, question_index)): Path<(Modality, usize)>,
) -> Response {
    info!("{} question {}: start requested", modality, question_index);

    match state.coordinator(modality).start(question_index).await {
        Ok(()) => accepted(modality, Some(question_index), "questionRecording:start"),
        Err(e) => {
            error!("Failed to signal start: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// POST /:modality/questions/:index/stop
pub async fn stop_recording(
    State(state): State<AppState>,
    Path((modality, question_index)): Path<(Modality, usize)>,
) -> Response {
    info!("{} question {}: stop requested", modality, question_index);

    match state.coordinator(modality).stop(question_index).await {
        Ok(()) => accepted(modality, Some(question_index), "questionRecording:stop"),
        Err(e) => {
            error!("Failed to signal stop: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// POST /:modality/questions/:index/upload
///
/// Raw file body. The name comes from `x-file-name` (default
/// `question_<i>`), the mime type from `content-type` when present.
pub async fn upload_recording(
    State(state): State<AppState>,
    Path((modality, question_index)): Path<(Modality, usize)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Upload body is empty");
    }

    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("question_{}", question_index));

    let mut file = UploadedFile::new(file_name, body.to_vec());
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| *value != "application/octet-stream")
    {
        file = file.with_content_type(content_type);
    }

    info!(
        "{} question {}: upload of {} ({} bytes)",
        modality,
        question_index,
        file.name,
        body.len()
    );

    match state.coordinator(modality).upload(question_index, file).await {
        Ok(()) => accepted(modality, Some(question_index), "questionRecording:upload"),
        Err(e) => {
            error!("Failed to signal upload: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// GET /:modality/recordings
pub async fn get_status(State(state): State<AppState>, Path(modality): Path<Modality>) -> Response {
    match state.coordinator(modality).status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            error!("Failed to get status: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// GET /:modality/recordings/export
pub async fn export_recordings(
    State(state): State<AppState>,
    Path(modality): Path<Modality>,
) -> Response {
    match state.coordinator(modality).export().await {
        Ok(manifest) => (StatusCode::OK, Json(manifest)).into_response(),
        Err(e) => {
            error!("Failed to export recordings: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// DELETE /:modality/recordings
pub async fn clear_recordings(
    State(state): State<AppState>,
    Path(modality): Path<Modality>,
) -> Response {
    info!("{} recordings: clear requested", modality);

    match state.coordinator(modality).clear().await {
        Ok(()) => accepted(modality, None, "questionRecording:clear"),
        Err(e) => {
            error!("Failed to signal clear: {}", e);
            failure(StatusCode::SERVICE_UNAVAILABLE, e)
        }
    }
}

/// GET /events
/// Server-sent events of both coordinators, until the server shuts down
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receivers = (
        state.audio.subscribe(),
        state.video.subscribe(),
        state.shutdown_signal(),
    );

    let events = stream::unfold(receivers, |(mut audio, mut video, mut shutdown)| async move {
        loop {
            let signal = next_signal(&mut audio, &mut video, &mut shutdown).await?;
            match Event::default()
                .event(signal.event.signal_name())
                .json_data(&signal)
            {
                Ok(event) => return Some((Ok(event), (audio, video, shutdown))),
                Err(e) => warn!("Dropping unserializable event: {}", e),
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Next event from either coordinator; `None` once a coordinator or the
/// server shuts down
async fn next_signal(
    audio: &mut broadcast::Receiver<RecordingEvent>,
    video: &mut broadcast::Receiver<RecordingEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<SseSignal> {
    loop {
        let (modality, received) = tokio::select! {
            _ = shutdown_requested(shutdown) => return None,
            received = audio.recv() => (Modality::Audio, received),
            received = video.recv() => (Modality::Video, received),
        };

        match received {
            Ok(event) => return Some(SseSignal { modality, event }),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event stream lagged, {} {} events skipped", skipped, modality)
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Resolves once the server starts shutting down (or its state is gone)
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stopping| *stopping).await;
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

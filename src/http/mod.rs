//! HTTP control surface for the question UI
//!
//! Each route forwards one signal to the coordinator of its modality
//! (`audio` or `video`):
//! - POST /:modality/questions/:index/start - Start capturing an answer
//! - POST /:modality/questions/:index/stop - Stop and keep the answer
//! - POST /:modality/questions/:index/upload - Store an uploaded file
//! - GET /:modality/recordings - Registry status
//! - GET /:modality/recordings/export - Attachments manifest
//! - DELETE /:modality/recordings - Discard everything
//! - GET /events - Server-sent events from both coordinators
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{AcceptedResponse, ErrorResponse, SseSignal, FILE_NAME_HEADER};
pub use routes::{create_router, MAX_UPLOAD_BYTES};
pub use state::AppState;

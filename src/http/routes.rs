use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Per-question signals
        .route(
            "/:modality/questions/:question_index/start",
            post(handlers::start_recording),
        )
        .route(
            "/:modality/questions/:question_index/stop",
            post(handlers::stop_recording),
        )
        .route(
            "/:modality/questions/:question_index/upload",
            post(handlers::upload_recording).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Registry
        .route(
            "/:modality/recordings",
            get(handlers::get_status).delete(handlers::clear_recordings),
        )
        .route(
            "/:modality/recordings/export",
            get(handlers::export_recordings),
        )
        // Outbound signals
        .route("/events", get(handlers::stream_events))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

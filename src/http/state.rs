use std::sync::Arc;

use tokio::sync::watch;

use crate::capture::Modality;
use crate::coordinator::CoordinatorHandle;

/// Shared application state for HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub audio: CoordinatorHandle,
    pub video: CoordinatorHandle,
    /// Flipped to `true` once the server starts shutting down
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    pub fn new(audio: CoordinatorHandle, video: CoordinatorHandle) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            audio,
            video,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Coordinator serving `modality`
    pub fn coordinator(&self, modality: Modality) -> &CoordinatorHandle {
        match modality {
            Modality::Audio => &self.audio,
            Modality::Video => &self.video,
        }
    }

    /// End every long-lived response (event streams) so graceful
    /// shutdown can complete
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

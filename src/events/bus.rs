use tokio::sync::broadcast;
use tracing::debug;

use super::messages::RecordingEvent;

/// Fan-out of coordinator signals to any number of subscribers
///
/// Publishing never blocks and never fails: with no subscribers the
/// event is simply dropped, and slow subscribers observe a lag.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RecordingEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: RecordingEvent) {
        debug!("Publishing {} ({:?})", event.signal_name(), event.question_index());
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

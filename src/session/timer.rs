use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::events::{EventBus, RecordingEvent};

/// Periodic elapsed-time clock bound to one capture session
///
/// Publishes `recordingTick` once per interval. Once `stop()` returns no
/// further tick is published: the tick task only publishes while holding
/// the `active` lock, and `stop()` clears the flag under that lock.
pub struct ElapsedTimer {
    question_index: usize,
    started_at: Instant,
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Start ticking every `interval`, first tick one interval from now
    pub fn start(question_index: usize, interval: Duration, events: EventBus) -> Self {
        let started_at = Instant::now();
        let active = Arc::new(Mutex::new(true));
        let period = interval.max(Duration::from_millis(1));

        let tick_active = Arc::clone(&active);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(started_at + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let active = tick_active.lock().await;
                if !*active {
                    break;
                }

                events.publish(RecordingEvent::RecordingTick {
                    question_index,
                    elapsed_ms: started_at.elapsed().as_millis() as u64,
                });
            }
        });

        debug!("Question {}: timer started ({:?} ticks)", question_index, period);

        Self {
            question_index,
            started_at,
            active,
            task: Some(task),
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Cancel the tick and return the final elapsed time
    pub async fn stop(&mut self) -> u64 {
        *self.active.lock().await = false;

        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Question {}: timer stopped", self.question_index);
        }

        self.elapsed_ms()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            if let Ok(mut active) = self.active.try_lock() {
                *active = false;
            }
            task.abort();
        }
    }
}

/// `mm:ss` rendering of an elapsed time
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

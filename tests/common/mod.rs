// Shared fixtures for integration tests
//
// `ScriptedDevice` stands in for platform capture: its behavior can be
// switched between acquisitions and every device call is recorded so
// tests can assert on acquire/finalize/release ordering.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use question_capture::{
    CaptureDevice, CaptureError, CaptureKind, Chunk, DeviceStream, RecordingEvent,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// What the next acquired stream does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Emit a `chunk_size` byte chunk every `period` once recording
    Chunks { period: Duration, chunk_size: usize },
    /// Record without ever producing data
    Silent,
    /// Acquisition fails: user refused access
    Deny,
    /// Acquisition fails: no hardware
    Unavailable,
    /// Acquisition succeeds, the recorder refuses to start
    RecorderFails,
    /// Acquisition waits forever, like an unanswered permission prompt
    NeverResolves,
}

impl Behavior {
    pub fn every_second(chunk_size: usize) -> Self {
        Behavior::Chunks {
            period: Duration::from_secs(1),
            chunk_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Acquire(String),
    StartRecorder(String, String),
    Finalize(String),
    Release(String),
}

pub struct ScriptedDevice {
    behavior: Mutex<Behavior>,
    supported: Vec<String>,
    calls: Arc<Mutex<Vec<DeviceCall>>>,
    next_id: AtomicUsize,
}

impl ScriptedDevice {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Self::with_supported(behavior, &["audio/webm", "video/webm;codecs=vp8,opus"])
    }

    pub fn with_supported(behavior: Behavior, supported: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            supported: supported.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(0),
        })
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Streams acquired but not yet released
    pub fn live_streams(&self) -> Vec<String> {
        let calls = self.calls();
        calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Acquire(id) => Some(id.clone()),
                _ => None,
            })
            .filter(|id| !calls.contains(&DeviceCall::Release(id.clone())))
            .collect()
    }

    pub fn release_count(&self, id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == DeviceCall::Release(id.to_string()))
            .count()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for ScriptedDevice {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported.iter().any(|s| s == mime_type)
    }

    async fn acquire(&self, kind: CaptureKind) -> Result<Box<dyn DeviceStream>, CaptureError> {
        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            Behavior::Deny => {
                return Err(CaptureError::PermissionDenied(
                    "user dismissed the prompt".to_string(),
                ))
            }
            Behavior::Unavailable => {
                return Err(CaptureError::DeviceNotAvailable("no input device".to_string()))
            }
            Behavior::NeverResolves => std::future::pending::<()>().await,
            _ => {}
        }

        let id = format!("stream-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.calls.lock().unwrap().push(DeviceCall::Acquire(id.clone()));

        Ok(Box::new(ScriptedStream {
            id,
            kind,
            behavior,
            calls: Arc::clone(&self.calls),
            task: None,
            live: true,
        }))
    }
}

struct ScriptedStream {
    id: String,
    kind: CaptureKind,
    behavior: Behavior,
    calls: Arc<Mutex<Vec<DeviceCall>>>,
    task: Option<JoinHandle<()>>,
    live: bool,
}

#[async_trait::async_trait]
impl DeviceStream for ScriptedStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> CaptureKind {
        self.kind
    }

    async fn start_recorder(&mut self, mime_type: &str) -> Result<mpsc::Receiver<Chunk>, CaptureError> {
        self.calls
            .lock()
            .unwrap()
            .push(DeviceCall::StartRecorder(self.id.clone(), mime_type.to_string()));

        let (tx, rx) = mpsc::channel(64);
        match self.behavior {
            Behavior::RecorderFails => {
                return Err(CaptureError::RecorderFailed("encoder crashed".to_string()))
            }
            Behavior::Chunks { period, chunk_size } => {
                self.task = Some(tokio::spawn(async move {
                    let mut emitted: u64 = 0;
                    loop {
                        tokio::time::sleep(period).await;
                        emitted += 1;
                        let chunk = Chunk::new(vec![emitted as u8; chunk_size], emitted * period.as_millis() as u64);
                        if tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                }));
            }
            // The sender lives in the task; with no task it is parked here
            // until finalize so the channel stays open.
            _ => {
                self.task = Some(tokio::spawn(async move {
                    let _tx = tx;
                    std::future::pending::<()>().await;
                }));
            }
        }

        Ok(rx)
    }

    async fn finalize(&mut self) -> Result<(), CaptureError> {
        self.calls.lock().unwrap().push(DeviceCall::Finalize(self.id.clone()));
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn release(&mut self) {
        self.calls.lock().unwrap().push(DeviceCall::Release(self.id.clone()));
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Let spawned tasks run to their next suspension point
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Everything published so far
pub fn drain(rx: &mut broadcast::Receiver<RecordingEvent>) -> Vec<RecordingEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Everything published so far except timer ticks
pub fn drain_signals(rx: &mut broadcast::Receiver<RecordingEvent>) -> Vec<RecordingEvent> {
    drain(rx)
        .into_iter()
        .filter(|event| !matches!(event, RecordingEvent::RecordingTick { .. }))
        .collect()
}

/// Signal names, for compact ordering assertions
pub fn names(events: &[RecordingEvent]) -> Vec<&'static str> {
    events.iter().map(RecordingEvent::signal_name).collect()
}

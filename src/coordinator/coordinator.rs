use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use super::config::{CoordinatorConfig, ExclusionPolicy};
use super::handle::CoordinatorHandle;
use crate::capture::{CaptureDevice, CaptureError, DeviceStream, Modality};
use crate::events::{Command, EventBus, QuestionState, RecordingEvent};
use crate::recording::{ExportManifest, Recording, RecordingRegistry, RecordingSummary, UploadedFile};
use crate::session::CaptureSession;

/// Queue depth of inbound signals
const COMMAND_CAPACITY: usize = 64;

/// Snapshot of one question for status queries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStatus {
    pub question_index: usize,
    pub state: QuestionState,
    /// Elapsed time of the live session, if recording
    pub elapsed_ms: Option<u64>,
    pub recording: Option<RecordingSummary>,
}

/// Snapshot of a coordinator for status queries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorStatus {
    pub modality: Modality,
    pub question_count: usize,
    /// Whether every question of the set has a recording
    pub complete: bool,
    pub active: Vec<usize>,
    /// Starts still waiting on the device
    pub pending: Vec<usize>,
    pub missing: Vec<usize>,
    pub questions: Vec<QuestionStatus>,
}

/// A start waiting on the device, e.g. for user consent
struct PendingStart {
    ticket: u64,
    mime_type: String,
    task: JoinHandle<()>,
}

/// Outcome of an acquisition, sent back to the event loop
struct Acquisition {
    question_index: usize,
    ticket: u64,
    result: Result<Box<dyn DeviceStream>, CaptureError>,
}

/// Orchestrates capture sessions for one modality
///
/// All mutation goes through `&mut self`, so when driven by `run` every
/// start, stop, upload and clear is applied one at a time. Device
/// acquisition runs on its own task and reports back through an internal
/// channel, so a pending permission prompt never blocks other signals.
pub struct Coordinator {
    config: CoordinatorConfig,
    device: Arc<dyn CaptureDevice>,
    sessions: HashMap<usize, CaptureSession>,
    pending: HashMap<usize, PendingStart>,
    next_ticket: u64,
    acquired_tx: mpsc::UnboundedSender<Acquisition>,
    acquired_rx: mpsc::UnboundedReceiver<Acquisition>,
    registry: RecordingRegistry,
    events: EventBus,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig, device: Arc<dyn CaptureDevice>, events: EventBus) -> Self {
        info!(
            "{} coordinator using {} ({} questions, {:?})",
            config.modality,
            device.name(),
            config.question_count,
            config.exclusion
        );

        let (acquired_tx, acquired_rx) = mpsc::unbounded_channel();

        Self {
            config,
            device,
            sessions: HashMap::new(),
            pending: HashMap::new(),
            next_ticket: 0,
            acquired_tx,
            acquired_rx,
            registry: RecordingRegistry::new(),
            events,
        }
    }

    pub fn modality(&self) -> Modality {
        self.config.modality
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.events.subscribe()
    }

    pub fn registry(&self) -> &RecordingRegistry {
        &self.registry
    }

    /// Question indices with a live session, ascending
    pub fn active_sessions(&self) -> Vec<usize> {
        let mut active: Vec<usize> = self.sessions.keys().copied().collect();
        active.sort_unstable();
        active
    }

    /// Question indices whose start is waiting on the device, ascending
    pub fn pending_starts(&self) -> Vec<usize> {
        let mut pending: Vec<usize> = self.pending.keys().copied().collect();
        pending.sort_unstable();
        pending
    }

    pub fn state(&self, question_index: usize) -> QuestionState {
        if self.sessions.contains_key(&question_index) {
            QuestionState::Recording
        } else if self.registry.contains(question_index) {
            QuestionState::Recorded
        } else {
            QuestionState::Ready
        }
    }

    /// Request a capture for `question_index`
    ///
    /// Under single-flight the live session is finalized (and any other
    /// pending start cancelled) first. The device is then acquired on a
    /// separate task; the session opens once `resolve_pending_start` (or
    /// `run`) receives the stream. Failures are published as
    /// `recordingError`; nothing is returned.
    pub async fn start(&mut self, question_index: usize) {
        if self.sessions.contains_key(&question_index) {
            warn!("Question {}: already recording", question_index);
            return;
        }
        if self.pending.contains_key(&question_index) {
            warn!("Question {}: already waiting for the device", question_index);
            return;
        }

        if self.config.exclusion == ExclusionPolicy::SingleFlight {
            for waiting in self.pending_starts() {
                info!(
                    "Question {}: cancelling pending start of question {}",
                    question_index, waiting
                );
                self.cancel_pending(waiting);
            }

            for active in self.active_sessions() {
                info!(
                    "Question {}: finalizing question {} before starting",
                    question_index, active
                );
                self.stop(active).await;
            }
        }

        let mime_type = self
            .config
            .codecs
            .negotiate(|mime| self.device.is_type_supported(mime));
        debug!("Question {}: negotiated {}", question_index, mime_type);

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let device = Arc::clone(&self.device);
        let kind = self.config.modality.capture_kind();
        let acquired_tx = self.acquired_tx.clone();
        let task = tokio::spawn(async move {
            let result = device.acquire(kind).await;
            let _ = acquired_tx.send(Acquisition {
                question_index,
                ticket,
                result,
            });
        });

        self.pending.insert(
            question_index,
            PendingStart {
                ticket,
                mime_type,
                task,
            },
        );
    }

    /// Wait for the next device acquisition and open its session
    ///
    /// `run` does this on its own; callers driving the coordinator
    /// directly call it after `start`.
    pub async fn resolve_pending_start(&mut self) {
        if let Some(acquisition) = self.acquired_rx.recv().await {
            self.complete_start(acquisition).await;
        }
    }

    async fn complete_start(&mut self, acquisition: Acquisition) {
        let Acquisition {
            question_index,
            ticket,
            result,
        } = acquisition;

        // Preempted or cleared while the device was pending
        if self.pending.get(&question_index).map(|p| p.ticket) != Some(ticket) {
            if let Ok(mut stream) = result {
                debug!(
                    "Question {}: start was cancelled, releasing stream {}",
                    question_index,
                    stream.id()
                );
                stream.release();
            }
            return;
        }
        let Some(pending) = self.pending.remove(&question_index) else {
            return;
        };

        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                self.report_error(question_index, &e);
                return;
            }
        };

        let session = match CaptureSession::open(
            question_index,
            self.config.modality,
            stream,
            pending.mime_type,
            &self.config.session,
            &self.events,
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                self.report_error(question_index, &e);
                return;
            }
        };

        if let Some(previous) = self.registry.remove(question_index) {
            debug!(
                "Question {}: discarding previous {:?} recording",
                question_index, previous.source_kind
            );
        }

        self.sessions.insert(question_index, session);
        self.events
            .publish(RecordingEvent::RecordingStarted { question_index });
        self.publish_state(question_index);
    }

    fn cancel_pending(&mut self, question_index: usize) {
        if let Some(pending) = self.pending.remove(&question_index) {
            pending.task.abort();
        }
    }

    /// Stop and finalize the session for `question_index`
    ///
    /// Silently ignored when nothing is recording for that index,
    /// including while its start is still waiting on the device.
    pub async fn stop(&mut self, question_index: usize) {
        let Some(session) = self.sessions.remove(&question_index) else {
            debug!("Question {}: no active session, ignoring stop", question_index);
            return;
        };

        match session.finish().await {
            Ok(recording) => {
                let media_blob = recording.media.clone();
                let duration_ms = recording.duration_ms.unwrap_or_default();
                self.registry.put(recording);

                self.publish_state(question_index);
                self.events.publish(RecordingEvent::RecordingCompleted {
                    question_index,
                    media_blob,
                    duration_ms,
                });
            }
            Err(e) => {
                self.report_error(question_index, &e);
                self.publish_state(question_index);
            }
        }
    }

    /// Store an uploaded file as the answer for `question_index`
    ///
    /// Independent of any capture session for that index.
    pub fn handle_upload(&mut self, question_index: usize, file: UploadedFile) {
        let recording = Recording::uploaded(question_index, file);

        info!(
            "Question {}: stored upload {:?} ({} bytes, {})",
            question_index,
            recording.file_name,
            recording.size_bytes,
            recording.media.mime_type()
        );

        self.registry.put(recording);
        self.publish_state(question_index);
    }

    /// Stop every session and forget every recording
    pub async fn clear(&mut self) {
        let mut known: BTreeSet<usize> = (0..self.config.question_count).collect();
        known.extend(self.sessions.keys().copied());
        known.extend(self.pending.keys().copied());
        known.extend(self.registry.indices());

        let cancelled = self.pending.len();
        for (_, pending) in self.pending.drain() {
            pending.task.abort();
        }

        let sessions: Vec<CaptureSession> = self.sessions.drain().map(|(_, session)| session).collect();
        let stopped = sessions.len();
        futures::future::join_all(sessions.into_iter().map(CaptureSession::discard)).await;

        let discarded = self.registry.clear();
        info!(
            "{} coordinator cleared ({} sessions stopped, {} starts cancelled, {} recordings discarded)",
            self.config.modality, stopped, cancelled, discarded
        );

        for question_index in known {
            self.publish_state(question_index);
        }
        self.events.publish(RecordingEvent::Cleared);
    }

    pub fn status(&self) -> CoordinatorStatus {
        let question_count = self.config.question_count;

        let mut indices: BTreeSet<usize> = (0..question_count).collect();
        indices.extend(self.sessions.keys().copied());
        indices.extend(self.pending.keys().copied());
        indices.extend(self.registry.indices());

        let questions = indices
            .into_iter()
            .map(|question_index| QuestionStatus {
                question_index,
                state: self.state(question_index),
                elapsed_ms: self.sessions.get(&question_index).map(CaptureSession::elapsed_ms),
                recording: self.registry.get(question_index).map(|r| r.summary()),
            })
            .collect();

        CoordinatorStatus {
            modality: self.config.modality,
            question_count,
            complete: self.registry.has_all(question_count),
            active: self.active_sessions(),
            pending: self.pending_starts(),
            missing: self.registry.missing(question_count),
            questions,
        }
    }

    pub fn export(&self) -> ExportManifest {
        ExportManifest::build(self.config.modality, self.config.question_count, &self.registry)
    }

    /// Apply one inbound signal
    pub async fn dispatch(&mut self, command: Command) {
        debug!("{} coordinator received {}", self.config.modality, command.signal_name());

        match command {
            Command::Start { question_index } => self.start(question_index).await,
            Command::Stop { question_index } => self.stop(question_index).await,
            Command::Upload { question_index, file } => self.handle_upload(question_index, file),
            Command::Clear => self.clear().await,
            Command::Status { reply } => {
                let _ = reply.send(self.status());
            }
            Command::Export { reply } => {
                let _ = reply.send(self.export());
            }
        }
    }

    /// Event loop: apply signals in order until every handle is dropped
    ///
    /// Also opens sessions as their device acquisitions complete and
    /// enforces the optional duration cap. At shutdown pending starts are
    /// cancelled and live sessions finalized.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!("{} coordinator running", self.config.modality);

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.dispatch(command).await,
                    None => break,
                },

                Some(acquisition) = self.acquired_rx.recv() => {
                    self.complete_start(acquisition).await;
                }

                question_index = wait_for_deadline(deadline) => {
                    info!("Question {}: maximum duration reached", question_index);
                    self.stop(question_index).await;
                }
            }
        }

        for question_index in self.pending_starts() {
            self.cancel_pending(question_index);
        }
        // Streams that arrived after their start was cancelled
        while let Ok(acquisition) = self.acquired_rx.try_recv() {
            self.complete_start(acquisition).await;
        }
        for question_index in self.active_sessions() {
            self.stop(question_index).await;
        }

        info!("{} coordinator stopped", self.config.modality);
    }

    /// Run the event loop on its own task
    pub fn spawn(self) -> (CoordinatorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let handle = CoordinatorHandle::new(self.config.modality, tx, self.events.clone());
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    /// Earliest session to hit the duration cap, if a cap is set
    fn next_deadline(&self) -> Option<(usize, Instant)> {
        let cap = self.config.session.max_duration?;

        self.sessions
            .values()
            .map(|session| (session.question_index(), session.started_at() + cap))
            .min_by_key(|(_, deadline)| *deadline)
    }

    fn publish_state(&self, question_index: usize) {
        self.events.publish(RecordingEvent::StateChanged {
            question_index,
            state: self.state(question_index),
        });
    }

    fn report_error(&self, question_index: usize, error: &CaptureError) {
        warn!("Question {}: {}", question_index, error);
        self.events.publish(RecordingEvent::RecordingError {
            question_index,
            error: error.to_string(),
        });
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.task.abort();
        }
    }
}

async fn wait_for_deadline(deadline: Option<(usize, Instant)>) -> usize {
    match deadline {
        Some((question_index, at)) => {
            sleep_until(at).await;
            question_index
        }
        None => std::future::pending().await,
    }
}

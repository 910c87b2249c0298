use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::chunk::{collect_chunks, ChunkBuffer};
use super::config::SessionConfig;
use super::timer::ElapsedTimer;
use crate::capture::{CaptureError, DeviceStream, Modality};
use crate::events::EventBus;
use crate::recording::Recording;

/// One in-progress recording for one question
///
/// Owns the device stream exclusively. The stream is released exactly
/// once: by `finish`, by `discard`, or as a last resort when the session
/// is dropped while still live.
pub struct CaptureSession {
    /// Session ID for log correlation
    id: Uuid,

    question_index: usize,

    modality: Modality,

    /// Negotiated recorder encoding
    mime_type: String,

    stream: Box<dyn DeviceStream>,

    /// Whether `stream` has been released
    released: bool,

    /// Task appending recorder output to the chunk buffer
    collector: Option<JoinHandle<ChunkBuffer>>,

    /// Tells the collector to stop waiting for the recorder
    collector_stop: Option<oneshot::Sender<()>>,

    timer: ElapsedTimer,
}

impl CaptureSession {
    /// Start the recorder on an acquired stream and begin buffering
    ///
    /// On failure the stream is released before the error is returned.
    pub async fn open(
        question_index: usize,
        modality: Modality,
        mut stream: Box<dyn DeviceStream>,
        mime_type: String,
        config: &SessionConfig,
        events: &EventBus,
    ) -> Result<Self, CaptureError> {
        let id = Uuid::new_v4();

        let chunk_rx = match stream.start_recorder(&mime_type).await {
            Ok(rx) => rx,
            Err(e) => {
                stream.release();
                return Err(e);
            }
        };

        let (collector_stop, stop_rx) = oneshot::channel();
        let collector = tokio::spawn(collect_chunks(question_index, chunk_rx, stop_rx));
        let timer = ElapsedTimer::start(question_index, config.tick_interval, events.clone());

        info!(
            "Question {}: capture session {} opened on {} ({})",
            question_index,
            id,
            stream.id(),
            mime_type
        );

        Ok(Self {
            id,
            question_index,
            modality,
            mime_type,
            stream,
            released: false,
            collector: Some(collector),
            collector_stop: Some(collector_stop),
            timer,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn started_at(&self) -> Instant {
        self.timer.started_at()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms()
    }

    /// Finalize the recorder and assemble everything it produced
    ///
    /// The timer is stopped and the stream released on every path, even
    /// when finalization fails or yields no data.
    pub async fn finish(mut self) -> Result<Recording, CaptureError> {
        info!("Question {}: finalizing session {}", self.question_index, self.id);

        if let Err(e) = self.stream.finalize().await {
            warn!(
                "Question {}: recorder finalize failed, keeping buffered chunks: {}",
                self.question_index, e
            );
        }

        let duration_ms = self.timer.stop().await;
        self.release_stream();
        let chunks = self.take_chunks().await;

        let mime_type = std::mem::take(&mut self.mime_type);
        let media = chunks
            .assemble(&mime_type)
            .ok_or(CaptureError::EmptyCapture(self.modality))?;

        info!(
            "Question {}: session {} recorded {} bytes in {}ms",
            self.question_index,
            self.id,
            media.size_bytes(),
            duration_ms
        );

        Ok(Recording::captured(self.question_index, media, duration_ms, self.id))
    }

    /// Tear the session down without producing a recording
    pub async fn discard(mut self) {
        self.timer.stop().await;
        self.release_stream();

        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
        self.collector_stop = None;

        info!("Question {}: session {} discarded", self.question_index, self.id);
    }

    async fn take_chunks(&mut self) -> ChunkBuffer {
        if let Some(stop) = self.collector_stop.take() {
            let _ = stop.send(());
        }

        match self.collector.take() {
            Some(collector) => match collector.await {
                Ok(buffer) => buffer,
                Err(e) => {
                    error!("Question {}: chunk collector failed: {}", self.question_index, e);
                    ChunkBuffer::new()
                }
            },
            None => ChunkBuffer::new(),
        }
    }

    fn release_stream(&mut self) {
        if self.released {
            return;
        }

        self.stream.release();
        self.released = true;

        info!(
            "Question {}: released stream {}",
            self.question_index,
            self.stream.id()
        );
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                "Question {}: session {} dropped while live, releasing stream",
                self.question_index, self.id
            );
            self.release_stream();
        }

        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
    }
}

use anyhow::{anyhow, Result};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::coordinator::CoordinatorStatus;
use crate::capture::Modality;
use crate::events::{Command, EventBus, RecordingEvent};
use crate::recording::{ExportManifest, UploadedFile};

/// Cloneable sender side of a running coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    modality: Modality,
    tx: mpsc::Sender<Command>,
    events: EventBus,
}

impl CoordinatorHandle {
    pub(crate) fn new(modality: Modality, tx: mpsc::Sender<Command>, events: EventBus) -> Self {
        Self {
            modality,
            tx,
            events,
        }
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.events.subscribe()
    }

    pub async fn start(&self, question_index: usize) -> Result<()> {
        self.send(Command::Start { question_index }).await
    }

    pub async fn stop(&self, question_index: usize) -> Result<()> {
        self.send(Command::Stop { question_index }).await
    }

    pub async fn upload(&self, question_index: usize, file: UploadedFile) -> Result<()> {
        self.send(Command::Upload {
            question_index,
            file,
        })
        .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.send(Command::Clear).await
    }

    pub async fn status(&self) -> Result<CoordinatorStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status { reply }).await?;
        rx.await.map_err(|_| self.not_running())
    }

    pub async fn export(&self) -> Result<ExportManifest> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Export { reply }).await?;
        rx.await.map_err(|_| self.not_running())
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).await.map_err(|_| self.not_running())
    }

    fn not_running(&self) -> anyhow::Error {
        anyhow!("{} coordinator is not running", self.modality)
    }
}

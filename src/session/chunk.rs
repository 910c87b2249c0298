use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::capture::Chunk;
use crate::recording::MediaBlob;

/// Append-only buffer of recorder output, in arrival order
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Chunk>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk`; zero-length fragments are dropped
    ///
    /// Returns whether the chunk was kept.
    pub fn push(&mut self, chunk: Chunk) -> bool {
        if chunk.data.is_empty() {
            return false;
        }

        self.total_bytes += chunk.data.len();
        self.chunks.push(chunk);
        true
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate every chunk into one blob, or `None` if nothing arrived
    pub fn assemble(self, mime_type: &str) -> Option<MediaBlob> {
        if self.chunks.is_empty() {
            return None;
        }

        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks {
            data.extend_from_slice(&chunk.data);
        }

        Some(MediaBlob::new(data, mime_type))
    }
}

/// Drain a recorder's chunk channel into a buffer
///
/// Runs until the recorder closes the channel, or until `stop` fires, in
/// which case whatever is already queued is still taken.
pub async fn collect_chunks(
    question_index: usize,
    mut chunk_rx: mpsc::Receiver<Chunk>,
    mut stop: oneshot::Receiver<()>,
) -> ChunkBuffer {
    let mut buffer = ChunkBuffer::new();

    loop {
        tokio::select! {
            biased;

            chunk = chunk_rx.recv() => match chunk {
                Some(chunk) => {
                    let size = chunk.data.len();
                    if buffer.push(chunk) {
                        debug!("Question {}: buffered chunk {} ({} bytes)", question_index, buffer.len(), size);
                    }
                }
                None => break,
            },

            _ = &mut stop => {
                while let Ok(chunk) = chunk_rx.try_recv() {
                    buffer.push(chunk);
                }
                break;
            }
        }
    }

    info!(
        "Question {}: collected {} chunks ({} bytes)",
        question_index,
        buffer.len(),
        buffer.total_bytes()
    );

    buffer
}

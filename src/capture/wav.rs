// File-backed capture device
//
// Replays a WAV file as if it were a live microphone: the recorder emits
// one chunk per interval and loops the file until finalized. The first
// chunk carries a streaming WAV header, so the concatenated chunks form a
// playable `audio/wav` artifact.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hound::WavReader;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::backend::{CaptureDevice, CaptureKind, Chunk, DeviceStream};
use super::error::CaptureError;

pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Size of the RIFF header written before the first chunk
pub const WAV_HEADER_SIZE: usize = 44;

/// Decoded samples of the source file
#[derive(Debug)]
struct WavSource {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl WavSource {
    fn open(path: &Path) -> Result<Self, CaptureError> {
        let reader = WavReader::open(path).map_err(|e| {
            CaptureError::DeviceNotAvailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        let spec = reader.spec();
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            return Err(CaptureError::DeviceNotAvailable(format!(
                "{} is not 16-bit PCM",
                path.display()
            )));
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CaptureError::DeviceNotAvailable(format!("cannot read samples: {}", e)))?;

        if samples.is_empty() {
            return Err(CaptureError::DeviceNotAvailable(format!(
                "{} contains no samples",
                path.display()
            )));
        }

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Interleaved samples covering `interval` of audio
    fn samples_per_chunk(&self, interval: Duration) -> usize {
        let per_second = self.sample_rate as u128 * self.channels as u128;
        ((per_second * interval.as_millis()) / 1000).max(1) as usize
    }
}

/// RIFF header for a stream whose final length is unknown
///
/// Both size fields are set to `u32::MAX`, the usual convention for
/// live WAV streams.
pub fn streaming_wav_header(sample_rate: u32, channels: u16) -> [u8; WAV_HEADER_SIZE] {
    let bit_depth: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;

    let mut header = [0u8; WAV_HEADER_SIZE];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&u32::MAX.to_le_bytes());
    header
}

/// Capture device that plays back a WAV file
pub struct WavFileDevice {
    path: PathBuf,
    chunk_interval: Duration,
}

impl WavFileDevice {
    pub fn new(path: impl Into<PathBuf>, chunk_interval: Duration) -> Self {
        Self {
            path: path.into(),
            chunk_interval,
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for WavFileDevice {
    fn name(&self) -> &str {
        "WAV file"
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        mime_type == WAV_MIME_TYPE
    }

    async fn acquire(&self, kind: CaptureKind) -> Result<Box<dyn DeviceStream>, CaptureError> {
        if kind != CaptureKind::Audio {
            return Err(CaptureError::UnsupportedKind(kind));
        }

        let path = self.path.clone();
        let source = tokio::task::spawn_blocking(move || WavSource::open(&path))
            .await
            .map_err(|e| CaptureError::DeviceNotAvailable(format!("loader task failed: {}", e)))??;

        info!(
            "Acquired WAV stream from {} ({}Hz, {} channels, {} samples)",
            self.path.display(),
            source.sample_rate,
            source.channels,
            source.samples.len()
        );

        Ok(Box::new(WavFileStream::new(
            Arc::new(source),
            self.chunk_interval,
        )))
    }
}

/// Live stream over a decoded WAV file
pub struct WavFileStream {
    id: String,
    source: Arc<WavSource>,
    chunk_interval: Duration,
    live: bool,
    stop_tx: Option<oneshot::Sender<()>>,
    recorder: Option<JoinHandle<()>>,
}

impl WavFileStream {
    fn new(source: Arc<WavSource>, chunk_interval: Duration) -> Self {
        Self {
            id: format!("wav-{}", uuid::Uuid::new_v4()),
            source,
            chunk_interval,
            live: true,
            stop_tx: None,
            recorder: None,
        }
    }
}

#[async_trait::async_trait]
impl DeviceStream for WavFileStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> CaptureKind {
        CaptureKind::Audio
    }

    async fn start_recorder(&mut self, mime_type: &str) -> Result<mpsc::Receiver<Chunk>, CaptureError> {
        if !self.live {
            return Err(CaptureError::RecorderFailed("stream already released".into()));
        }
        if self.recorder.is_some() {
            return Err(CaptureError::RecorderFailed("recorder already started".into()));
        }
        if mime_type != WAV_MIME_TYPE {
            warn!("WAV device asked for {}, emitting {} instead", mime_type, WAV_MIME_TYPE);
        }

        let (chunk_tx, chunk_rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let period = self.chunk_interval;
        let stream_id = self.id.clone();

        let recorder = tokio::spawn(async move {
            let samples_per_chunk = source.samples_per_chunk(period);
            let started = Instant::now();
            let mut ticker = interval_at(started + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cursor = 0usize;
            let mut header_sent = false;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let mut data = Vec::with_capacity(WAV_HEADER_SIZE + samples_per_chunk * 2);
                        if !header_sent {
                            data.extend_from_slice(&streaming_wav_header(source.sample_rate, source.channels));
                            header_sent = true;
                        }
                        for _ in 0..samples_per_chunk {
                            data.extend_from_slice(&source.samples[cursor].to_le_bytes());
                            cursor = (cursor + 1) % source.samples.len();
                        }

                        let chunk = Chunk::new(data, started.elapsed().as_millis() as u64);
                        if chunk_tx.send(chunk).await.is_err() {
                            debug!("Chunk receiver for {} dropped", stream_id);
                            break;
                        }
                    }
                }
            }

            debug!("WAV recorder for {} stopped", stream_id);
        });

        self.stop_tx = Some(stop_tx);
        self.recorder = Some(recorder);

        Ok(chunk_rx)
    }

    async fn finalize(&mut self) -> Result<(), CaptureError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(recorder) = self.recorder.take() {
            recorder
                .await
                .map_err(|e| CaptureError::RecorderFailed(format!("recorder task failed: {}", e)))?;
        }

        Ok(())
    }

    fn release(&mut self) {
        if !self.live {
            return;
        }

        if let Some(recorder) = self.recorder.take() {
            recorder.abort();
        }
        self.stop_tx = None;
        self.live = false;

        info!("Released WAV stream {}", self.id);
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

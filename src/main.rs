use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use question_capture::{
    create_router, AppState, CaptureDevice, Config, Coordinator, EventBus, Modality,
    WavFileDevice,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "question-capture", version, about = "Per-question answer recording service")]
struct Args {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config/question-capture")]
    config: String,

    /// WAV file replayed as the capture device
    #[arg(long)]
    wav: Option<PathBuf>,

    /// HTTP port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(wav) = args.wav {
        cfg.capture.wav_path = wav;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Questions per set: {}, capture device: {}",
        cfg.capture.question_count,
        cfg.capture.wav_path.display()
    );

    let device: Arc<dyn CaptureDevice> = Arc::new(WavFileDevice::new(
        cfg.capture.wav_path.clone(),
        cfg.chunk_interval(),
    ));

    let (audio, audio_task) = Coordinator::new(
        cfg.coordinator_config(Modality::Audio),
        Arc::clone(&device),
        EventBus::new(cfg.capture.event_capacity),
    )
    .spawn();
    let (video, video_task) = Coordinator::new(
        cfg.coordinator_config(Modality::Video),
        device,
        EventBus::new(cfg.capture.event_capacity),
    )
    .spawn();

    let state = AppState::new(audio, video);
    let app = create_router(state.clone());

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context("HTTP server failed")?;

    // The router owned the last handles; both loops now finalize and exit.
    audio_task.await.context("Audio coordinator panicked")?;
    video_task.await.context("Video coordinator panicked")?;

    info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl-C, then end open event streams so connections can drain
async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
    state.shutdown();
}

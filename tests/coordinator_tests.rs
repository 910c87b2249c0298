// Integration tests for the recording coordinator
//
// These tests drive a coordinator against a scripted capture device on a
// paused clock, and verify the published signals, the registry contents
// and the device call ordering.

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{drain, drain_signals, names, settle, Behavior, DeviceCall, ScriptedDevice};
use question_capture::{
    CaptureDevice, Coordinator, CoordinatorConfig, EventBus, ExclusionPolicy, Modality,
    QuestionState, RecordingEvent, SessionConfig, SourceKind, UploadedFile,
};
use tokio::time::sleep;

fn coordinator(device: &Arc<ScriptedDevice>, config: CoordinatorConfig) -> Coordinator {
    let device: Arc<dyn CaptureDevice> = device.clone();
    Coordinator::new(config, device, EventBus::new(256))
}

fn audio_config() -> CoordinatorConfig {
    CoordinatorConfig::new(Modality::Audio, 5)
}

/// Start `question_index` and wait for the device to hand over a stream
async fn begin(coordinator: &mut Coordinator, question_index: usize) {
    coordinator.start(question_index).await;
    coordinator.resolve_pending_start().await;
}

/// Record `question_index` for `millis` of (paused) time
async fn record(coordinator: &mut Coordinator, question_index: usize, millis: u64) {
    begin(coordinator, question_index).await;
    sleep(Duration::from_millis(millis)).await;
    settle().await;
    coordinator.stop(question_index).await;
}

#[tokio::test(start_paused = true)]
async fn test_start_wait_stop_records_captured_answer() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(100));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    record(&mut coordinator, 0, 3000).await;

    let recording = coordinator.registry().get(0).expect("recording for question 0");
    assert_eq!(recording.source_kind, SourceKind::Captured);
    let duration = recording.duration_ms.expect("captured duration");
    assert!((3000..3100).contains(&duration), "duration was {}", duration);
    assert_eq!(recording.media.mime_type(), "audio/webm");
    assert_eq!(&recording.media.bytes()[..100], &[1u8; 100][..]);
    assert_eq!(&recording.media.bytes()[100..200], &[2u8; 100][..]);
    assert!(coordinator.registry().has_all(1));
    assert_eq!(coordinator.state(0), QuestionState::Recorded);

    let signals = drain_signals(&mut events);
    assert_eq!(
        names(&signals),
        vec!["recordingStarted", "stateChanged", "stateChanged", "recordingCompleted"]
    );
    match &signals[3] {
        RecordingEvent::RecordingCompleted {
            question_index,
            media_blob,
            duration_ms,
        } => {
            assert_eq!(*question_index, 0);
            assert_eq!(*duration_ms, duration);
            assert_eq!(media_blob.size_bytes(), recording.size_bytes);
        }
        other => panic!("unexpected signal {:?}", other),
    }

    assert_eq!(
        device.calls(),
        vec![
            DeviceCall::Acquire("stream-0".into()),
            DeviceCall::StartRecorder("stream-0".into(), "audio/webm".into()),
            DeviceCall::Finalize("stream-0".into()),
            DeviceCall::Release("stream-0".into()),
        ]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_starting_second_question_finalizes_first() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    begin(&mut coordinator, 0).await;
    sleep(Duration::from_millis(1500)).await;
    settle().await;
    begin(&mut coordinator, 1).await;

    assert_eq!(coordinator.active_sessions(), vec![1]);
    assert!(coordinator.registry().contains(0));
    assert_eq!(coordinator.state(0), QuestionState::Recorded);
    assert_eq!(coordinator.state(1), QuestionState::Recording);

    let calls = device.calls();
    let position = |call: DeviceCall| calls.iter().position(|c| *c == call).expect("call made");
    let released_first = position(DeviceCall::Release("stream-0".into()));
    let finalized_first = position(DeviceCall::Finalize("stream-0".into()));
    let acquired_second = position(DeviceCall::Acquire("stream-1".into()));
    assert!(finalized_first < acquired_second);
    assert!(released_first < acquired_second);

    let signals = drain_signals(&mut events);
    assert_eq!(
        names(&signals),
        vec![
            "recordingStarted",
            "stateChanged",
            "stateChanged",
            "recordingCompleted",
            "recordingStarted",
            "stateChanged",
        ]
    );
    assert_eq!(signals[3].question_index(), Some(0));
    assert_eq!(signals[4].question_index(), Some(1));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_denied_acquisition_reports_error_and_keeps_slot() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    record(&mut coordinator, 0, 2000).await;

    let mut events = coordinator.subscribe();
    device.set_behavior(Behavior::Deny);
    begin(&mut coordinator, 2).await;

    let signals = drain(&mut events);
    assert_eq!(signals.len(), 1, "only the error is published: {:?}", signals);
    match &signals[0] {
        RecordingEvent::RecordingError {
            question_index,
            error,
        } => {
            assert_eq!(*question_index, 2);
            assert!(error.starts_with("permission denied"), "error was {:?}", error);
        }
        other => panic!("unexpected signal {:?}", other),
    }

    assert!(!coordinator.registry().contains(2));
    assert!(coordinator.registry().has_all(1));
    assert_eq!(coordinator.state(2), QuestionState::Ready);
    assert!(coordinator.active_sessions().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_device_reports_error() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::Unavailable);
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    begin(&mut coordinator, 1).await;

    let signals = drain(&mut events);
    assert!(matches!(
        &signals[..],
        [RecordingEvent::RecordingError { question_index: 1, error }] if error.starts_with("device not available")
    ));
    assert!(device.calls().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_chunk_reports_empty_capture() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    begin(&mut coordinator, 3).await;
    coordinator.stop(3).await;

    let signals = drain_signals(&mut events);
    assert_eq!(
        names(&signals),
        vec!["recordingStarted", "stateChanged", "recordingError", "stateChanged"]
    );
    match &signals[2] {
        RecordingEvent::RecordingError { error, .. } => {
            assert_eq!(error, "No audio data recorded")
        }
        other => panic!("unexpected signal {:?}", other),
    }
    assert!(matches!(
        signals[3],
        RecordingEvent::StateChanged {
            question_index: 3,
            state: QuestionState::Ready
        }
    ));

    assert!(!coordinator.registry().contains(3));
    assert!(device.live_streams().is_empty());
    assert_eq!(device.release_count("stream-0"), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_silent_video_capture_reports_empty_video() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::Silent);
    let mut coordinator = coordinator(&device, CoordinatorConfig::new(Modality::Video, 3));
    let mut events = coordinator.subscribe();

    record(&mut coordinator, 0, 4000).await;

    let errors: Vec<String> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            RecordingEvent::RecordingError { error, .. } => Some(error),
            _ => None,
        })
        .collect();
    assert_eq!(errors, vec!["No video data recorded".to_string()]);
    assert!(coordinator.registry().is_empty());

    // Video acquires camera and microphone with the negotiated vp8 encoding
    assert_eq!(
        device.calls()[1],
        DeviceCall::StartRecorder("stream-0".into(), "video/webm;codecs=vp8,opus".into())
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_recorder_failure_releases_stream() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::RecorderFails);
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    begin(&mut coordinator, 0).await;

    let signals = drain(&mut events);
    assert_eq!(names(&signals), vec!["recordingError"]);
    assert_eq!(device.release_count("stream-0"), 1);
    assert!(coordinator.active_sessions().is_empty());
    assert_eq!(coordinator.state(0), QuestionState::Ready);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_upload_stores_file_without_session() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    coordinator.handle_upload(4, UploadedFile::new("answer.m4a", vec![0u8; 50 * 1024]));

    let recording = coordinator.registry().get(4).expect("uploaded recording");
    assert_eq!(recording.source_kind, SourceKind::Uploaded);
    assert_eq!(recording.size_bytes, 51200);
    assert_eq!(recording.file_name.as_deref(), Some("answer.m4a"));
    assert_eq!(recording.media.mime_type(), "audio/mp4");
    assert_eq!(recording.duration_ms, None);
    assert!(recording.session_id.is_none());

    assert!(device.calls().is_empty());
    assert!(matches!(
        &drain(&mut events)[..],
        [RecordingEvent::StateChanged {
            question_index: 4,
            state: QuestionState::Recorded
        }]
    ));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_upload_overwrites_captured_answer() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    record(&mut coordinator, 2, 2000).await;

    coordinator.handle_upload(
        2,
        UploadedFile::new("take-two.bin", vec![7u8; 1234]).with_content_type("audio/ogg"),
    );

    let recording = coordinator.registry().get(2).expect("recording");
    assert_eq!(recording.source_kind, SourceKind::Uploaded);
    assert_eq!(recording.size_bytes, 1234);
    assert_eq!(recording.media.mime_type(), "audio/ogg");
    assert_eq!(coordinator.registry().len(), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rerecording_replaces_previous_answer() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    record(&mut coordinator, 1, 2000).await;
    let first = coordinator.registry().get(1).expect("first take").clone();

    device.set_behavior(Behavior::every_second(50));
    begin(&mut coordinator, 1).await;

    // The previous take is gone as soon as the new session is live
    assert!(!coordinator.registry().contains(1));
    assert_eq!(coordinator.state(1), QuestionState::Recording);

    sleep(Duration::from_millis(3000)).await;
    settle().await;
    coordinator.stop(1).await;

    let second = coordinator.registry().get(1).expect("second take");
    assert_ne!(first.session_id, second.session_id);
    assert!(second.size_bytes >= 100);
    assert_eq!(second.size_bytes % 50, 0);
    assert!(coordinator.registry().has_all(1));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_recordings_and_releases_sessions() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    for question_index in 0..3 {
        record(&mut coordinator, question_index, 2000).await;
    }
    begin(&mut coordinator, 3).await;
    sleep(Duration::from_millis(1500)).await;
    settle().await;

    let mut events = coordinator.subscribe();
    coordinator.clear().await;

    assert!(coordinator.registry().is_empty());
    assert!(coordinator.registry().has_all(0));
    assert!(coordinator.active_sessions().is_empty());
    assert!(device.live_streams().is_empty());
    assert_eq!(device.release_count("stream-3"), 1);

    let signals = drain_signals(&mut events);
    assert!(!names(&signals).contains(&"recordingCompleted"));
    assert!(matches!(signals.last(), Some(RecordingEvent::Cleared)));

    let reset: Vec<usize> = signals
        .iter()
        .filter_map(|event| match event {
            RecordingEvent::StateChanged {
                question_index,
                state: QuestionState::Ready,
            } => Some(*question_index),
            _ => None,
        })
        .collect();
    assert_eq!(reset, vec![0, 1, 2, 3, 4]);

    // No ticks from the discarded session
    sleep(Duration::from_secs(5)).await;
    settle().await;
    assert!(drain(&mut events).is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_session_is_silent() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    coordinator.stop(1).await;

    assert!(drain(&mut events).is_empty());
    assert!(device.calls().is_empty());
    assert_eq!(coordinator.state(1), QuestionState::Ready);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_start_while_recording_is_noop() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());

    begin(&mut coordinator, 0).await;
    coordinator.start(0).await;

    let acquisitions = device
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DeviceCall::Acquire(_)))
        .count();
    assert_eq!(acquisitions, 1);
    assert_eq!(coordinator.active_sessions(), vec![0]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_per_question_policy_runs_sessions_concurrently() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let config =
        CoordinatorConfig::new(Modality::Video, 3).with_exclusion(ExclusionPolicy::PerQuestion);
    let mut coordinator = coordinator(&device, config);

    begin(&mut coordinator, 0).await;
    begin(&mut coordinator, 2).await;
    sleep(Duration::from_millis(1500)).await;
    settle().await;

    assert_eq!(coordinator.active_sessions(), vec![0, 2]);
    assert!(!device
        .calls()
        .iter()
        .any(|call| matches!(call, DeviceCall::Finalize(_))));

    coordinator.stop(2).await;
    assert_eq!(coordinator.active_sessions(), vec![0]);
    assert!(coordinator.registry().contains(2));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_timer_ticks_stop_with_session() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    begin(&mut coordinator, 0).await;
    sleep(Duration::from_millis(2500)).await;
    settle().await;

    let ticks: Vec<u64> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            RecordingEvent::RecordingTick { elapsed_ms, .. } => Some(elapsed_ms),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![1000, 2000]);

    coordinator.stop(0).await;
    drain(&mut events);

    sleep(Duration::from_secs(5)).await;
    settle().await;
    let late_ticks = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, RecordingEvent::RecordingTick { .. }))
        .count();
    assert_eq!(late_ticks, 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_status_reports_question_states() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let config =
        CoordinatorConfig::new(Modality::Audio, 3).with_exclusion(ExclusionPolicy::PerQuestion);
    let mut coordinator = coordinator(&device, config);

    record(&mut coordinator, 0, 2000).await;
    begin(&mut coordinator, 1).await;

    let status = coordinator.status();
    assert_eq!(status.question_count, 3);
    assert!(!status.complete);
    assert_eq!(status.active, vec![1]);
    assert_eq!(status.missing, vec![1, 2]);

    let states: Vec<QuestionState> = status.questions.iter().map(|q| q.state).collect();
    assert_eq!(
        states,
        vec![QuestionState::Recorded, QuestionState::Recording, QuestionState::Ready]
    );
    assert!(status.questions[0].recording.is_some());
    assert_eq!(status.questions[1].elapsed_ms, Some(0));

    let json = serde_json::to_value(&status)?;
    assert_eq!(json["modality"], "audio");
    assert_eq!(json["questions"][0]["state"], "recorded");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_export_names_attachments_per_question() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, CoordinatorConfig::new(Modality::Audio, 2));

    record(&mut coordinator, 0, 2000).await;
    coordinator.handle_upload(1, UploadedFile::new("second.mp3", vec![3u8; 64]));

    let manifest = coordinator.export();
    assert!(manifest.complete);
    assert_eq!(manifest.attachments.len(), 2);
    assert_eq!(manifest.attachments[0].field_name, "audio_0");
    assert_eq!(manifest.attachments[0].file_name, "question_0.webm");
    assert_eq!(manifest.attachments[1].field_name, "audio_1");
    assert_eq!(manifest.attachments[1].file_name, "second.mp3");
    assert_eq!(manifest.attachments[1].mime_type, "audio/mpeg");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_duration_cap_stops_session() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let config = audio_config().with_session(SessionConfig {
        tick_interval: Duration::from_secs(1),
        max_duration: Some(Duration::from_secs(2)),
    });
    let (handle, task) = coordinator(&device, config).spawn();
    let mut events = handle.subscribe();

    handle.start(0).await?;
    sleep(Duration::from_millis(2500)).await;
    settle().await;

    let status = handle.status().await?;
    assert!(status.active.is_empty());
    assert_eq!(status.questions[0].state, QuestionState::Recorded);

    let completed = drain(&mut events).into_iter().find_map(|event| match event {
        RecordingEvent::RecordingCompleted { duration_ms, .. } => Some(duration_ms),
        _ => None,
    });
    assert_eq!(completed, Some(2000));

    drop(handle);
    task.await?;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_finalizes_open_sessions() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let (handle, task) = coordinator(&device, audio_config()).spawn();
    let mut events = handle.subscribe();

    handle.start(0).await?;
    sleep(Duration::from_millis(1500)).await;
    settle().await;

    drop(handle);
    task.await?;

    assert!(device.live_streams().is_empty());
    assert!(names(&drain_signals(&mut events)).contains(&"recordingCompleted"));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_stopped_coordinator() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let (handle, task) = coordinator(&device, audio_config()).spawn();

    task.abort();
    let _ = task.await;

    let err = handle.start(0).await.unwrap_err();
    assert_eq!(err.to_string(), "audio coordinator is not running");
    assert!(handle.status().await.is_err());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_pending_permission_does_not_block_other_signals() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let config =
        CoordinatorConfig::new(Modality::Video, 3).with_exclusion(ExclusionPolicy::PerQuestion);
    let (handle, task) = coordinator(&device, config).spawn();
    let mut events = handle.subscribe();

    handle.start(0).await?;
    sleep(Duration::from_millis(1500)).await;
    settle().await;

    // Question 1 waits on a permission prompt nobody answers
    device.set_behavior(Behavior::NeverResolves);
    handle.start(1).await?;
    handle.stop(0).await?;

    let status = tokio::time::timeout(Duration::from_secs(5), handle.status()).await??;
    assert!(status.active.is_empty());
    assert_eq!(status.pending, vec![1]);
    assert_eq!(status.questions[0].state, QuestionState::Recorded);
    assert_eq!(status.questions[1].state, QuestionState::Ready);

    let signals = drain_signals(&mut events);
    assert!(signals.iter().any(|event| matches!(
        event,
        RecordingEvent::RecordingCompleted { question_index: 0, .. }
    )));
    assert!(!signals
        .iter()
        .any(|event| matches!(event, RecordingEvent::RecordingStarted { question_index: 1 })));

    // Clearing gives up on the prompt
    handle.clear().await?;
    let status = handle.status().await?;
    assert!(status.pending.is_empty());
    assert!(status.questions.iter().all(|q| q.state == QuestionState::Ready));

    drop(handle);
    task.await?;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_duration_cap_fires_while_another_start_waits() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let config = CoordinatorConfig::new(Modality::Audio, 3)
        .with_exclusion(ExclusionPolicy::PerQuestion)
        .with_session(SessionConfig {
            tick_interval: Duration::from_secs(1),
            max_duration: Some(Duration::from_secs(2)),
        });
    let (handle, task) = coordinator(&device, config).spawn();

    handle.start(0).await?;
    settle().await;
    device.set_behavior(Behavior::NeverResolves);
    handle.start(2).await?;

    sleep(Duration::from_millis(2500)).await;
    settle().await;

    let status = handle.status().await?;
    assert_eq!(status.questions[0].state, QuestionState::Recorded);
    assert_eq!(status.pending, vec![2]);

    drop(handle);
    task.await?;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_single_flight_start_cancels_pending_start() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::NeverResolves);
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    coordinator.start(0).await;
    assert_eq!(coordinator.pending_starts(), vec![0]);

    device.set_behavior(Behavior::every_second(10));
    begin(&mut coordinator, 1).await;

    assert!(coordinator.pending_starts().is_empty());
    assert_eq!(coordinator.active_sessions(), vec![1]);
    assert_eq!(device.live_streams(), vec!["stream-0".to_string()]);

    let started: Vec<usize> = drain_signals(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            RecordingEvent::RecordingStarted { question_index } => Some(question_index),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![1]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_start_while_waiting_for_device_is_noop() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::NeverResolves);
    let mut coordinator = coordinator(&device, audio_config());
    let mut events = coordinator.subscribe();

    coordinator.start(2).await;
    coordinator.start(2).await;
    coordinator.stop(2).await;

    assert_eq!(coordinator.pending_starts(), vec![2]);
    assert_eq!(coordinator.state(2), QuestionState::Ready);
    assert!(drain(&mut events).is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_upload_during_live_session_reports_recording_state() -> Result<()> {
    let device = ScriptedDevice::new(Behavior::every_second(10));
    let mut coordinator = coordinator(&device, audio_config());
    begin(&mut coordinator, 0).await;
    let mut events = coordinator.subscribe();

    coordinator.handle_upload(0, UploadedFile::new("draft.wav", vec![1u8; 32]));

    assert!(matches!(
        &drain_signals(&mut events)[..],
        [RecordingEvent::StateChanged {
            question_index: 0,
            state: QuestionState::Recording
        }]
    ));
    assert_eq!(coordinator.status().questions[0].state, QuestionState::Recording);

    Ok(())
}

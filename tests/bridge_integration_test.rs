//! Integration tests for the recorder bridge
//!
//! These tests drive the bridge exactly as the JNI exports do, against a
//! StubRecorder, covering:
//! - The identification string
//! - Verbatim forwarding of start/stop to the injected recorder
//! - Failure reporting (return value, last error, events)
//!
//! No audio hardware is required.

use std::path::PathBuf;
use std::sync::Arc;

use testoboe::error::RecorderErrorCodes;
use testoboe::events::{BridgeOperation, RecorderEvent};
use testoboe::recorder::{RecorderCall, StubRecorder};
use testoboe::{
    ErrorCode, InputPreset, PerformanceMode, Recorder, RecorderBridge, RecorderConfig,
    RecorderError,
};

fn bridge_with_stub(stub: &Arc<StubRecorder>) -> RecorderBridge {
    RecorderBridge::new(stub.clone(), RecorderConfig::default())
}

#[test]
fn test_identify_returns_fixed_string() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    assert_eq!(bridge.identify(), "Oboe tester");
    assert_eq!(bridge.identify(), bridge.identify());
    assert!(stub.calls().is_empty());
}

#[test]
fn test_start_forwards_path_and_rate_verbatim() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    bridge
        .start_recording("/sdcard/Music/x.wav", 48000)
        .expect("start should succeed");

    let requests = stub.start_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, PathBuf::from("/sdcard/Music/x.wav"));
    assert_eq!(requests[0].sample_rate, 48000);
    assert_eq!(requests[0].input_preset, InputPreset::Unprocessed);
    assert_eq!(requests[0].performance_mode, PerformanceMode::LowLatency);
    assert!(bridge.is_recording());
}

#[test]
fn test_start_forwards_unicode_path_untouched() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);
    let path = "/sdcard/Music/My Recordings/café 録音 ñ.wav";

    bridge.start_recording(path, 22050).unwrap();

    let request = &stub.start_requests()[0];
    assert_eq!(request.path, PathBuf::from(path));
    assert_eq!(request.path.to_str(), Some(path));
    assert_eq!(request.sample_rate, 22050);
}

#[test]
fn test_undecodable_start_is_reported() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    let err = RecorderError::InvalidPath {
        reason: "could not decode Java string".to_string(),
    };
    assert!(bridge.reject_start(err.clone()).is_err());

    assert!(stub.calls().is_empty());
    assert_eq!(
        bridge.last_error().map(|e| e.code()),
        Some(RecorderErrorCodes::INVALID_PATH)
    );
    assert_eq!(bridge.last_error().map(|e| e.message()), Some(err.message()));
}

#[test]
fn test_start_with_ndk_codes() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    bridge
        .start_recording_with("/sdcard/Music/y.wav", 44100, 6, 11)
        .expect("start should succeed");

    let request = &stub.start_requests()[0];
    assert_eq!(request.sample_rate, 44100);
    assert_eq!(request.input_preset, InputPreset::VoiceRecognition);
    assert_eq!(request.performance_mode, PerformanceMode::PowerSaving);
}

#[test]
fn test_stop_forwards_once_per_call() {
    let stub = Arc::new(StubRecorder::with_frames(48000));
    let bridge = bridge_with_stub(&stub);

    bridge.start_recording("/sdcard/Music/x.wav", 48000).unwrap();
    let summary = bridge.stop_recording().expect("stop should succeed");

    assert_eq!(summary.frames_written, 48000);
    assert_eq!(summary.duration_ms, 1000);
    assert_eq!(
        stub.calls()
            .iter()
            .filter(|call| **call == RecorderCall::Stop)
            .count(),
        1
    );
    assert!(!bridge.is_recording());
}

#[test]
fn test_double_start_forwards_both_calls() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    assert!(bridge.start_recording("/sdcard/Music/a.wav", 48000).is_ok());
    assert_eq!(
        bridge.start_recording("/sdcard/Music/b.wav", 48000),
        Err(RecorderError::AlreadyRecording)
    );

    // The bridge keeps no state of its own; the recorder decides
    assert_eq!(stub.start_requests().len(), 2);
    assert_eq!(stub.start_requests()[1].path, PathBuf::from("/sdcard/Music/b.wav"));
}

#[test]
fn test_stop_without_start_reports_failure() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    let result = bridge.stop_recording();
    assert_eq!(result, Err(RecorderError::NotRecording));
    assert_eq!(stub.calls(), vec![RecorderCall::Stop]);
    assert_eq!(
        bridge.last_error().map(|err| err.code()),
        Some(RecorderError::NotRecording.code())
    );
}

#[test]
fn test_recorder_failure_is_surfaced() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);
    let err = RecorderError::StreamOpenFailed {
        reason: "device busy".to_string(),
    };
    stub.fail_next_start(err.clone());

    assert_eq!(
        bridge.start_recording("/sdcard/Music/x.wav", 48000),
        Err(err.clone())
    );
    assert_eq!(bridge.last_error(), Some(err));

    // Next success clears the error
    bridge.start_recording("/sdcard/Music/x.wav", 48000).unwrap();
    assert_eq!(bridge.last_error(), None);
}

#[test]
fn test_bridge_uses_injected_instance() {
    let stub = Arc::new(StubRecorder::new());
    let bridge = bridge_with_stub(&stub);

    assert!(std::ptr::addr_eq(
        Arc::as_ptr(bridge.recorder()),
        Arc::as_ptr(&stub)
    ));

    bridge.start_recording("/sdcard/Music/a.wav", 48000).unwrap();
    bridge.stop_recording().unwrap();
    bridge.start_recording("/sdcard/Music/b.wav", 48000).unwrap();
    bridge.stop_recording().unwrap();

    assert_eq!(stub.calls().len(), 4);
    assert!(!stub.is_recording());
}

#[test]
fn test_lifecycle_events() {
    let stub = Arc::new(StubRecorder::with_frames(4800));
    let bridge = bridge_with_stub(&stub);
    let mut rx = bridge.subscribe();

    bridge.start_recording("/sdcard/Music/x.wav", 48000).unwrap();
    bridge.stop_recording().unwrap();
    let _ = bridge.stop_recording();

    match rx.try_recv() {
        Ok(RecorderEvent::Started { path, sample_rate }) => {
            assert_eq!(path, PathBuf::from("/sdcard/Music/x.wav"));
            assert_eq!(sample_rate, 48000);
        }
        other => panic!("expected Started, got {:?}", other),
    }
    match rx.try_recv() {
        Ok(RecorderEvent::Stopped { summary }) => assert_eq!(summary.duration_ms, 100),
        other => panic!("expected Stopped, got {:?}", other),
    }
    match rx.try_recv() {
        Ok(RecorderEvent::Failed {
            operation, code, ..
        }) => {
            assert_eq!(operation, BridgeOperation::Stop);
            assert_eq!(code, RecorderError::NotRecording.code());
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

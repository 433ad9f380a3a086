// RecorderBridge: forwarding layer between the Kotlin activity and the recorder
//
// The JNI exports only decode arguments and encode results; everything that
// can be tested off-device lives here.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::config::{InputPreset, PerformanceMode, RecorderConfig};
use crate::error::{log_recorder_error, ErrorCode, RecorderError};
use crate::events::{BridgeOperation, EventBroadcaster, RecorderEvent};
use crate::recorder::{Recorder, RecordingRequest, RecordingSummary};

/// String returned by `stringFromJNI`
pub const IDENTIFICATION: &str = "Oboe tester";

/// Status code for the managed side: `0` on success, the error code otherwise
pub fn status_code<T>(result: &Result<T, RecorderError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}

/// RecorderBridge: owns the injected recorder and its call bookkeeping
///
/// - Argument validation at the boundary (path, sample rate, NDK codes)
/// - Forwarding to the one recorder instance it was built with
/// - Last-error tracking so the activity can ask why a call returned `false`
/// - Lifecycle events for subscribers
pub struct RecorderBridge {
    recorder: Arc<dyn Recorder>,
    config: RecorderConfig,
    last_error: Mutex<Option<RecorderError>>,
    events: EventBroadcaster,
}

impl RecorderBridge {
    pub fn new(recorder: Arc<dyn Recorder>, config: RecorderConfig) -> Self {
        Self {
            recorder,
            config,
            last_error: Mutex::new(None),
            events: EventBroadcaster::default(),
        }
    }

    pub fn identify(&self) -> &'static str {
        IDENTIFICATION
    }

    /// Start recording `path` at `sample_rate` with the configured preset and mode
    pub fn start_recording(&self, path: &str, sample_rate: i32) -> Result<(), RecorderError> {
        let result = self.build_request(
            path,
            sample_rate,
            self.config.input_preset,
            self.config.performance_mode,
        );
        self.forward_start(result)
    }

    /// Start recording with explicit NDK input preset and performance mode codes
    pub fn start_recording_with(
        &self,
        path: &str,
        sample_rate: i32,
        input_preset: i32,
        performance_mode: i32,
    ) -> Result<(), RecorderError> {
        let result = InputPreset::from_ndk(input_preset).and_then(|preset| {
            let mode = PerformanceMode::from_ndk(performance_mode)?;
            self.build_request(path, sample_rate, preset, mode)
        });
        self.forward_start(result)
    }

    /// Report a start that failed before its arguments could be decoded
    ///
    /// Goes through the same bookkeeping as a rejected start, so the last
    /// error and the `Failed` event reflect it.
    pub fn reject_start(&self, err: RecorderError) -> Result<(), RecorderError> {
        self.forward_start(Err(err))
    }

    pub fn stop_recording(&self) -> Result<RecordingSummary, RecorderError> {
        let result = self.recorder.stop();
        match &result {
            Ok(summary) => {
                tracing::info!(
                    "[Bridge] Stopped recording {} ({} frames, {} dropped)",
                    summary.path.display(),
                    summary.frames_written,
                    summary.dropped_frames
                );
                self.clear_error();
                self.events.publish(RecorderEvent::Stopped {
                    summary: summary.clone(),
                });
            }
            Err(err) => self.record_failure(BridgeOperation::Stop, err),
        }
        result
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Most recent start/stop failure, cleared by the next success
    pub fn last_error(&self) -> Option<RecorderError> {
        self.last_error
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| {
                Some(RecorderError::LockPoisoned {
                    component: "last_error".to_string(),
                })
            })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    pub fn recorder(&self) -> &Arc<dyn Recorder> {
        &self.recorder
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    fn build_request(
        &self,
        path: &str,
        sample_rate: i32,
        input_preset: InputPreset,
        performance_mode: PerformanceMode,
    ) -> Result<RecordingRequest, RecorderError> {
        if path.is_empty() {
            return Err(RecorderError::InvalidPath {
                reason: "path is empty".to_string(),
            });
        }
        let sample_rate = u32::try_from(sample_rate)
            .ok()
            .filter(|rate| *rate > 0)
            .ok_or(RecorderError::InvalidSampleRate { rate: sample_rate })?;

        Ok(RecordingRequest {
            path: PathBuf::from(path),
            sample_rate,
            input_preset,
            performance_mode,
        })
    }

    fn forward_start(
        &self,
        request: Result<RecordingRequest, RecorderError>,
    ) -> Result<(), RecorderError> {
        let result = request.and_then(|request| {
            self.recorder.start(&request)?;
            Ok(request)
        });

        match result {
            Ok(request) => {
                tracing::info!(
                    "[Bridge] Started recording {} at {} Hz",
                    request.path.display(),
                    request.sample_rate
                );
                self.clear_error();
                self.events.publish(RecorderEvent::Started {
                    path: request.path,
                    sample_rate: request.sample_rate,
                });
                Ok(())
            }
            Err(err) => {
                self.record_failure(BridgeOperation::Start, &err);
                Err(err)
            }
        }
    }

    fn record_failure(&self, operation: BridgeOperation, err: &RecorderError) {
        let context = match operation {
            BridgeOperation::Start => "start_recording",
            BridgeOperation::Stop => "stop_recording",
        };
        log_recorder_error(err, context);

        if let Ok(mut guard) = self.last_error.lock() {
            *guard = Some(err.clone());
        }
        self.events.publish(RecorderEvent::Failed {
            operation,
            code: err.code(),
            message: err.message(),
        });
    }

    fn clear_error(&self) {
        if let Ok(mut guard) = self.last_error.lock() {
            *guard = None;
        }
    }
}

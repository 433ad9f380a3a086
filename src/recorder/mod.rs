//! Recorder abstraction the bridge forwards to.
//!
//! The capture itself is done by the platform audio library (Oboe on Android,
//! cpal on desktop); implementations here only open the input stream and wire
//! it to the WAV writer.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{InputPreset, PerformanceMode};
use crate::error::RecorderError;

pub mod naming;
pub mod stub;

#[cfg(target_os = "android")]
mod oboe;
#[cfg(target_os = "android")]
pub use self::oboe::OboeRecorder;

#[cfg(not(target_os = "android"))]
mod cpal;
#[cfg(not(target_os = "android"))]
pub use self::cpal::CpalRecorder;

pub use naming::{recording_file_name, recording_path};
pub use stub::{RecorderCall, StubRecorder};

/// Parameters of a single recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingRequest {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub input_preset: InputPreset,
    pub performance_mode: PerformanceMode,
}

/// Outcome of a finished recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingSummary {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub frames_written: u64,
    pub dropped_frames: u64,
    pub duration_ms: u64,
}

impl RecordingSummary {
    pub fn new(request: &RecordingRequest, frames_written: u64, dropped_frames: u64) -> Self {
        let duration_ms = if request.sample_rate == 0 {
            0
        } else {
            frames_written * 1000 / u64::from(request.sample_rate)
        };
        Self {
            path: request.path.clone(),
            sample_rate: request.sample_rate,
            frames_written,
            dropped_frames,
            duration_ms,
        }
    }
}

/// Trait implemented by platform-specific recorders.
///
/// Implementations reject `start` while a recording is active
/// ([`RecorderError::AlreadyRecording`]) and `stop` while idle
/// ([`RecorderError::NotRecording`]).
pub trait Recorder: Send + Sync {
    fn start(&self, request: &RecordingRequest) -> Result<(), RecorderError>;
    fn stop(&self) -> Result<RecordingSummary, RecorderError>;
    fn is_recording(&self) -> bool;
}

// Recorder backed by the platform's native audio input.
#[cfg(target_os = "android")]
pub type PlatformRecorder = OboeRecorder;

#[cfg(not(target_os = "android"))]
pub type PlatformRecorder = CpalRecorder;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_duration() {
        let request = RecordingRequest {
            path: PathBuf::from("/sdcard/Music/a.wav"),
            sample_rate: 48000,
            input_preset: InputPreset::Unprocessed,
            performance_mode: PerformanceMode::LowLatency,
        };
        let summary = RecordingSummary::new(&request, 72000, 3);
        assert_eq!(summary.duration_ms, 1500);
        assert_eq!(summary.dropped_frames, 3);
        assert_eq!(summary.path, request.path);
    }
}

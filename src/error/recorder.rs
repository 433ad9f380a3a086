// Recorder error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Recorder error code constants shared with the Kotlin side
///
/// The activity reads these back through `lastRecorderErrorCode()` after a
/// `startRecording`/`stopRecording` call returned `false`.
///
/// Error code range: 1001-1017
pub struct RecorderErrorCodes {}

impl RecorderErrorCodes {
    /// Sample rate is not a positive number of frames per second
    pub const INVALID_SAMPLE_RATE: i32 = 1001;

    /// A recording is already in progress
    pub const ALREADY_RECORDING: i32 = 1002;

    /// No recording is in progress
    pub const NOT_RECORDING: i32 = 1003;

    /// Hardware error occurred
    pub const HARDWARE_ERROR: i32 = 1004;

    /// Recorder configuration cannot be used (e.g. zero buffer sizing)
    pub const INVALID_CONFIG: i32 = 1005;

    /// Failed to open audio stream
    pub const STREAM_OPEN_FAILED: i32 = 1006;

    /// Mutex/RwLock was poisoned
    pub const LOCK_POISONED: i32 = 1007;

    /// JNI initialization failed on Android
    pub const JNI_INIT_FAILED: i32 = 1008;

    /// Android context was not initialized
    pub const CONTEXT_NOT_INITIALIZED: i32 = 1009;

    /// Audio stream or writer thread failed unexpectedly
    pub const STREAM_FAILURE: i32 = 1010;

    /// Output path is empty or could not be decoded
    pub const INVALID_PATH: i32 = 1011;

    /// Output file could not be created
    pub const FILE_CREATE_FAILED: i32 = 1012;

    /// Writing samples or finalizing the WAV header failed
    pub const FILE_WRITE_FAILED: i32 = 1013;

    /// File is not a readable WAV file
    pub const INVALID_WAV_FILE: i32 = 1014;

    /// Input preset code has no NDK counterpart
    pub const UNSUPPORTED_INPUT_PRESET: i32 = 1015;

    /// Performance mode code has no NDK counterpart
    pub const UNSUPPORTED_PERFORMANCE_MODE: i32 = 1016;

    /// JNI export called before JNI_OnLoad installed the bridge
    pub const BRIDGE_NOT_INSTALLED: i32 = 1017;
}

/// Log a recorder error with structured context
///
/// This function logs recorder errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: The operation that failed
pub fn log_recorder_error(err: &RecorderError, context: &str) {
    error!(
        "Recorder error in {}: code={}, component=Recorder, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Recorder-related errors
///
/// These errors cover the bridge boundary (argument decoding), the recorder
/// lifecycle, stream management and the WAV file sink.
///
/// Error code range: 1001-1017
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderError {
    /// Sample rate must be > 0
    InvalidSampleRate { rate: i32 },

    /// A recording is already in progress
    AlreadyRecording,

    /// No recording is in progress
    NotRecording,

    /// Hardware error occurred
    HardwareError { details: String },

    /// Configuration values the recorder cannot run with
    InvalidConfig { reason: String },

    /// Failed to open audio stream
    StreamOpenFailed { reason: String },

    /// Mutex/RwLock was poisoned
    LockPoisoned { component: String },

    /// JNI initialization failed on Android
    JniInitFailed { reason: String },

    /// Android context could not be initialized
    ContextNotInitialized,

    /// Stream or writer thread disconnected unexpectedly
    StreamFailure { reason: String },

    /// Output path is empty or could not be decoded
    InvalidPath { reason: String },

    /// Output file could not be created
    FileCreateFailed { path: String, reason: String },

    /// Writing samples or finalizing the file failed
    FileWriteFailed { reason: String },

    /// File is not a readable WAV file
    InvalidWavFile { reason: String },

    /// Unknown NDK input preset code
    UnsupportedInputPreset { code: i32 },

    /// Unknown NDK performance mode code
    UnsupportedPerformanceMode { code: i32 },

    /// Bridge has not been installed yet
    BridgeNotInstalled,
}

impl ErrorCode for RecorderError {
    fn code(&self) -> i32 {
        match self {
            RecorderError::InvalidSampleRate { .. } => RecorderErrorCodes::INVALID_SAMPLE_RATE,
            RecorderError::AlreadyRecording => RecorderErrorCodes::ALREADY_RECORDING,
            RecorderError::NotRecording => RecorderErrorCodes::NOT_RECORDING,
            RecorderError::HardwareError { .. } => RecorderErrorCodes::HARDWARE_ERROR,
            RecorderError::InvalidConfig { .. } => RecorderErrorCodes::INVALID_CONFIG,
            RecorderError::StreamOpenFailed { .. } => RecorderErrorCodes::STREAM_OPEN_FAILED,
            RecorderError::LockPoisoned { .. } => RecorderErrorCodes::LOCK_POISONED,
            RecorderError::JniInitFailed { .. } => RecorderErrorCodes::JNI_INIT_FAILED,
            RecorderError::ContextNotInitialized => RecorderErrorCodes::CONTEXT_NOT_INITIALIZED,
            RecorderError::StreamFailure { .. } => RecorderErrorCodes::STREAM_FAILURE,
            RecorderError::InvalidPath { .. } => RecorderErrorCodes::INVALID_PATH,
            RecorderError::FileCreateFailed { .. } => RecorderErrorCodes::FILE_CREATE_FAILED,
            RecorderError::FileWriteFailed { .. } => RecorderErrorCodes::FILE_WRITE_FAILED,
            RecorderError::InvalidWavFile { .. } => RecorderErrorCodes::INVALID_WAV_FILE,
            RecorderError::UnsupportedInputPreset { .. } => {
                RecorderErrorCodes::UNSUPPORTED_INPUT_PRESET
            }
            RecorderError::UnsupportedPerformanceMode { .. } => {
                RecorderErrorCodes::UNSUPPORTED_PERFORMANCE_MODE
            }
            RecorderError::BridgeNotInstalled => RecorderErrorCodes::BRIDGE_NOT_INSTALLED,
        }
    }

    fn message(&self) -> String {
        match self {
            RecorderError::InvalidSampleRate { rate } => {
                format!("Sample rate must be greater than 0 (got {})", rate)
            }
            RecorderError::AlreadyRecording => {
                "Recorder already running. Call stopRecording() first.".to_string()
            }
            RecorderError::NotRecording => {
                "Recorder not running. Call startRecording() first.".to_string()
            }
            RecorderError::HardwareError { details } => {
                format!("Hardware error: {}", details)
            }
            RecorderError::InvalidConfig { reason } => {
                format!("Invalid recorder configuration: {}", reason)
            }
            RecorderError::StreamOpenFailed { reason } => {
                format!("Failed to open audio stream: {}", reason)
            }
            RecorderError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            RecorderError::JniInitFailed { reason } => {
                format!("JNI initialization failed: {}", reason)
            }
            RecorderError::ContextNotInitialized => {
                "Android context not initialized".to_string()
            }
            RecorderError::StreamFailure { reason } => {
                format!("Audio stream failed: {}", reason)
            }
            RecorderError::InvalidPath { reason } => {
                format!("Invalid output path: {}", reason)
            }
            RecorderError::FileCreateFailed { path, reason } => {
                format!("Failed to create {}: {}", path, reason)
            }
            RecorderError::FileWriteFailed { reason } => {
                format!("Failed to write recording: {}", reason)
            }
            RecorderError::InvalidWavFile { reason } => {
                format!("Not a valid WAV file: {}", reason)
            }
            RecorderError::UnsupportedInputPreset { code } => {
                format!("Unsupported input preset code {}", code)
            }
            RecorderError::UnsupportedPerformanceMode { code } => {
                format!("Unsupported performance mode code {}", code)
            }
            RecorderError::BridgeNotInstalled => {
                "Recorder bridge not installed. JNI_OnLoad did not run.".to_string()
            }
        }
    }
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecorderError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RecorderError {}

impl From<std::io::Error> for RecorderError {
    fn from(err: std::io::Error) -> Self {
        RecorderError::FileWriteFailed {
            reason: err.to_string(),
        }
    }
}

impl From<hound::Error> for RecorderError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => io.into(),
            other => RecorderError::InvalidWavFile {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_error_codes() {
        assert_eq!(
            RecorderError::InvalidSampleRate { rate: 0 }.code(),
            RecorderErrorCodes::INVALID_SAMPLE_RATE
        );
        assert_eq!(
            RecorderError::AlreadyRecording.code(),
            RecorderErrorCodes::ALREADY_RECORDING
        );
        assert_eq!(
            RecorderError::NotRecording.code(),
            RecorderErrorCodes::NOT_RECORDING
        );
        assert_eq!(
            RecorderError::StreamOpenFailed {
                reason: "test".to_string()
            }
            .code(),
            RecorderErrorCodes::STREAM_OPEN_FAILED
        );
        assert_eq!(
            RecorderError::FileCreateFailed {
                path: "/x.wav".to_string(),
                reason: "test".to_string()
            }
            .code(),
            RecorderErrorCodes::FILE_CREATE_FAILED
        );
        assert_eq!(
            RecorderError::UnsupportedInputPreset { code: 42 }.code(),
            RecorderErrorCodes::UNSUPPORTED_INPUT_PRESET
        );
        assert_eq!(
            RecorderError::BridgeNotInstalled.code(),
            RecorderErrorCodes::BRIDGE_NOT_INSTALLED
        );
    }

    #[test]
    fn test_codes_are_contiguous() {
        let codes = [
            RecorderErrorCodes::INVALID_SAMPLE_RATE,
            RecorderErrorCodes::ALREADY_RECORDING,
            RecorderErrorCodes::NOT_RECORDING,
            RecorderErrorCodes::HARDWARE_ERROR,
            RecorderErrorCodes::INVALID_CONFIG,
            RecorderErrorCodes::STREAM_OPEN_FAILED,
            RecorderErrorCodes::LOCK_POISONED,
            RecorderErrorCodes::JNI_INIT_FAILED,
            RecorderErrorCodes::CONTEXT_NOT_INITIALIZED,
            RecorderErrorCodes::STREAM_FAILURE,
            RecorderErrorCodes::INVALID_PATH,
            RecorderErrorCodes::FILE_CREATE_FAILED,
            RecorderErrorCodes::FILE_WRITE_FAILED,
            RecorderErrorCodes::INVALID_WAV_FILE,
            RecorderErrorCodes::UNSUPPORTED_INPUT_PRESET,
            RecorderErrorCodes::UNSUPPORTED_PERFORMANCE_MODE,
            RecorderErrorCodes::BRIDGE_NOT_INSTALLED,
        ];
        for (offset, code) in codes.iter().enumerate() {
            assert_eq!(*code, 1001 + offset as i32);
        }
    }

    #[test]
    fn test_recorder_error_messages() {
        let err = RecorderError::InvalidSampleRate { rate: -1 };
        assert_eq!(err.message(), "Sample rate must be greater than 0 (got -1)");

        let err = RecorderError::AlreadyRecording;
        assert!(err.message().contains("already running"));

        let err = RecorderError::NotRecording;
        assert!(err.message().contains("not running"));

        let err = RecorderError::HardwareError {
            details: "test error".to_string(),
        };
        assert_eq!(err.message(), "Hardware error: test error");
    }

    #[test]
    fn test_recorder_error_display() {
        let err = RecorderError::NotRecording;
        let display = format!("{}", err);
        assert!(display.contains("RecorderError"));
        assert!(display.contains("1003"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("disk full");
        let err: RecorderError = io_err.into();
        match err {
            RecorderError::FileWriteFailed { reason } => assert!(reason.contains("disk full")),
            other => panic!("Expected FileWriteFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_from_io_permission_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: RecorderError = io_err.into();
        assert_eq!(err.code(), RecorderErrorCodes::FILE_WRITE_FAILED);
    }

    #[test]
    fn test_from_hound_format_error() {
        let err: RecorderError = hound::Error::FormatError("no RIFF tag found").into();
        assert_eq!(err.code(), RecorderErrorCodes::INVALID_WAV_FILE);
    }

    #[test]
    fn test_error_code_trait_object() {
        let err: &dyn ErrorCode = &RecorderError::InvalidConfig {
            reason: "buffer_size is 0".to_string(),
        };
        assert_eq!(err.code(), 1005);
        assert_eq!(
            err.message(),
            "Invalid recorder configuration: buffer_size is 0"
        );
    }
}

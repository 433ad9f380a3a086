// Error types for the recording bridge
//
// This module defines the recorder error type with numeric codes suitable for
// crossing the JNI boundary back to the Kotlin activity.

mod recorder;

pub use recorder::{log_recorder_error, RecorderError, RecorderErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

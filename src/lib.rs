// Oboe Tester Core - Rust microphone recorder behind a JNI bridge
// Real-time capture into 16-bit PCM WAV through a lock-free buffer pipeline

// Module declarations
pub mod audio;
pub mod bridge;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod recorder;

#[cfg(target_os = "android")]
pub mod jni_bridge;

// Re-exports for convenience
pub use bridge::{RecorderBridge, IDENTIFICATION};
pub use config::{InputPreset, PerformanceMode, RecorderConfig};
pub use error::{ErrorCode, RecorderError};
pub use events::RecorderEvent;
pub use recorder::{PlatformRecorder, Recorder, RecordingRequest, RecordingSummary};

/// JNI_OnLoad is called when the native library is loaded by Android
///
/// Sets up logging, hands the application context to ndk-context for oboe-rs
/// and installs the bridge around a single OboeRecorder.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    vm: jni::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    use std::sync::Arc;

    logging::init_logging();
    log::info!("JNI_OnLoad called - initializing Android context");

    // Recording can still be attempted without it; oboe reports the failure
    if let Err(err) = jni_bridge::init_android_context(&vm) {
        error::log_recorder_error(&err, "JNI_OnLoad");
    }

    let config = RecorderConfig::load_android();
    let recorder = Arc::new(recorder::OboeRecorder::new(config.clone()));
    match jni_bridge::install_bridge(RecorderBridge::new(recorder, config)) {
        Ok(()) => log::info!("Recorder bridge installed"),
        Err(err) => error::log_recorder_error(&err, "JNI_OnLoad"),
    }

    jni::sys::JNI_VERSION_1_6
}

//! Logging setup.
//!
//! `log` records are bridged into `tracing`, so both macro families end up in
//! logcat on Android and on stderr on desktop.

/// Logcat tag, shared with the activity's own `Log.i` calls
pub const LOG_TAG: &str = "OboeAudioRecorder";

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Install the logcat subscriber. Returns `false` if one was already set.
        pub fn init_logging() -> bool {
            use tracing_subscriber::filter::LevelFilter;
            use tracing_subscriber::prelude::*;

            let layer = match tracing_android::layer(LOG_TAG) {
                Ok(layer) => layer,
                Err(_) => return false,
            };
            tracing_subscriber::registry()
                .with(LevelFilter::DEBUG)
                .with(layer)
                .try_init()
                .is_ok()
        }
    } else {
        /// Install a stderr subscriber. Returns `false` if one was already set.
        pub fn init_logging() -> bool {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let _ = init_logging();
        assert!(!init_logging(), "second install must be a no-op");
    }
}

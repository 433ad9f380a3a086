//! Configuration management for the recorder
//!
//! This module provides runtime configuration loading from JSON files so the
//! stream parameters (sample rate, input preset, performance mode) and the
//! buffer pool sizing can be tuned without recompiling the native library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::audio::buffer_pool::{DEFAULT_BUFFER_COUNT, DEFAULT_BUFFER_SIZE};
use crate::error::RecorderError;

/// Default recording sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Microphone input preset, mirroring the NDK `aaudio_input_preset_t` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPreset {
    Generic,
    Camcorder,
    VoiceRecognition,
    VoiceCommunication,
    Unprocessed,
    VoicePerformance,
}

impl InputPreset {
    pub const ALL: [InputPreset; 6] = [
        InputPreset::Generic,
        InputPreset::Camcorder,
        InputPreset::VoiceRecognition,
        InputPreset::VoiceCommunication,
        InputPreset::Unprocessed,
        InputPreset::VoicePerformance,
    ];

    /// NDK integer code passed from the Kotlin side
    pub fn ndk_code(self) -> i32 {
        match self {
            InputPreset::Generic => 1,
            InputPreset::Camcorder => 5,
            InputPreset::VoiceRecognition => 6,
            InputPreset::VoiceCommunication => 7,
            InputPreset::Unprocessed => 9,
            InputPreset::VoicePerformance => 10,
        }
    }

    pub fn from_ndk(code: i32) -> Result<Self, RecorderError> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.ndk_code() == code)
            .ok_or(RecorderError::UnsupportedInputPreset { code })
    }

    pub fn name(self) -> &'static str {
        match self {
            InputPreset::Generic => "Generic",
            InputPreset::Camcorder => "Camcorder",
            InputPreset::VoiceRecognition => "VoiceRecognition",
            InputPreset::VoiceCommunication => "VoiceCommunication",
            InputPreset::Unprocessed => "Unprocessed",
            InputPreset::VoicePerformance => "VoicePerformance",
        }
    }
}

impl fmt::Display for InputPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown input preset '{}'", s))
    }
}

/// Stream performance mode, mirroring the NDK `aaudio_performance_mode_t` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceMode {
    None,
    PowerSaving,
    LowLatency,
}

impl PerformanceMode {
    pub const ALL: [PerformanceMode; 3] = [
        PerformanceMode::None,
        PerformanceMode::PowerSaving,
        PerformanceMode::LowLatency,
    ];

    pub fn ndk_code(self) -> i32 {
        match self {
            PerformanceMode::None => 10,
            PerformanceMode::PowerSaving => 11,
            PerformanceMode::LowLatency => 12,
        }
    }

    pub fn from_ndk(code: i32) -> Result<Self, RecorderError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.ndk_code() == code)
            .ok_or(RecorderError::UnsupportedPerformanceMode { code })
    }

    pub fn name(self) -> &'static str {
        match self {
            PerformanceMode::None => "None",
            PerformanceMode::PowerSaving => "PowerSaving",
            PerformanceMode::LowLatency => "LowLatency",
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PerformanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown performance mode '{}'", s))
    }
}

/// Recorder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Sample rate used by the CLI harness when none is given
    pub sample_rate: u32,
    /// Input preset used by the two-argument `startRecording`
    pub input_preset: InputPreset,
    /// Performance mode used by the two-argument `startRecording`
    pub performance_mode: PerformanceMode,
    /// Number of pre-allocated buffers between callback and writer
    pub buffer_pool_size: usize,
    /// Capacity of each buffer in frames
    pub buffer_size: usize,
    /// Writer thread sleep between queue drains
    pub writer_poll_interval_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            input_preset: InputPreset::Unprocessed,
            performance_mode: PerformanceMode::LowLatency,
            buffer_pool_size: DEFAULT_BUFFER_COUNT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            writer_poll_interval_ms: 10,
        }
    }
}

impl RecorderConfig {
    /// Load configuration from JSON file
    ///
    /// Missing files and malformed JSON fall back to the defaults with a
    /// warning; a recording app should still come up with sane settings.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(err) => {
                        log::warn!(
                            "[Config] Rejected configuration from {:?}: {}. Using defaults.",
                            path.as_ref(),
                            err
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check the values a recorder cannot start with
    pub fn validate(&self) -> Result<(), RecorderError> {
        if self.buffer_pool_size == 0 {
            return Err(RecorderError::InvalidConfig {
                reason: "buffer_pool_size must be greater than 0".to_string(),
            });
        }
        if self.buffer_size == 0 {
            return Err(RecorderError::InvalidConfig {
                reason: "buffer_size must be greater than 0".to_string(),
            });
        }
        if self.sample_rate == 0 || i32::try_from(self.sample_rate).is_err() {
            return Err(RecorderError::InvalidConfig {
                reason: format!("sample_rate {} is out of range", self.sample_rate),
            });
        }
        Ok(())
    }

    /// Configuration used when the library is loaded by the Android runtime
    #[cfg(target_os = "android")]
    pub fn load_android() -> Self {
        log::info!("[Config] Using default recorder configuration");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/recorder_config.json")
    }
}

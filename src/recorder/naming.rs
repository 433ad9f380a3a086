// Recording file names: aud_<timestamp>_preset-<preset>_pMode-<mode>.wav

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::{InputPreset, PerformanceMode};

pub fn recording_file_name(
    timestamp: NaiveDateTime,
    input_preset: InputPreset,
    performance_mode: PerformanceMode,
) -> String {
    format!(
        "aud_{}_preset-{}_pMode-{}.wav",
        timestamp.format("%Y_%m_%d_%H_%M_%S"),
        input_preset,
        performance_mode
    )
}

/// File in `dir` named after the current local time
pub fn recording_path(
    dir: &Path,
    input_preset: InputPreset,
    performance_mode: PerformanceMode,
) -> PathBuf {
    dir.join(recording_file_name(
        Local::now().naive_local(),
        input_preset,
        performance_mode,
    ))
}

//! WAV file sink and header inspection
//!
//! Recordings are written as mono 16-bit PCM, the format the activity feeds to
//! `MediaScannerConnection` and plays back through `AudioTrack`.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::RecorderError;

pub const RECORDING_CHANNELS: u16 = 1;
pub const RECORDING_BITS_PER_SAMPLE: u16 = 16;

/// WAVE format tag for integer PCM
pub const FORMAT_PCM: u16 = 1;
/// WAVE format tag for IEEE float
pub const FORMAT_IEEE_FLOAT: u16 = 3;

/// Convert a float sample to 16-bit PCM, clamping out-of-range input
#[inline]
pub fn f32_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Remove a partially created recording when `result` is an error
pub fn discard_on_error<T>(
    path: &Path,
    result: Result<T, RecorderError>,
) -> Result<T, RecorderError> {
    if result.is_err() && path.exists() {
        if let Err(err) = std::fs::remove_file(path) {
            log::warn!("[WavSink] Could not remove {}: {}", path.display(), err);
        }
    }
    result
}

/// Streaming writer for a single recording
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
    frames_written: u64,
}

impl WavSink {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self, RecorderError> {
        let spec = WavSpec {
            channels: RECORDING_CHANNELS,
            sample_rate,
            bits_per_sample: RECORDING_BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let writer =
            WavWriter::create(path, spec).map_err(|err| RecorderError::FileCreateFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            frames_written: 0,
        })
    }

    pub fn write_samples(&mut self, samples: &[f32]) -> Result<(), RecorderError> {
        let mut pcm = self.writer.get_i16_writer(samples.len() as u32);
        for &sample in samples {
            pcm.write_sample(f32_to_i16(sample));
        }
        pcm.flush()?;
        self.frames_written += samples.len() as u64;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Patch the RIFF/data sizes and close the file
    pub fn finalize(self) -> Result<u64, RecorderError> {
        self.writer.finalize()?;
        Ok(self.frames_written)
    }
}

/// Header fields of an existing WAV file
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WavInfo {
    pub format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_bytes: u64,
    pub frames: u64,
}

impl WavInfo {
    pub fn read(path: &Path) -> Result<Self, RecorderError> {
        let reader = WavReader::open(path).map_err(|err| RecorderError::InvalidWavFile {
            reason: format!("{}: {}", path.display(), err),
        })?;
        let spec = reader.spec();
        let frames = u64::from(reader.duration());
        let bytes_per_frame = u64::from(spec.channels) * u64::from(spec.bits_per_sample / 8);

        Ok(Self {
            format: match spec.sample_format {
                SampleFormat::Int => FORMAT_PCM,
                SampleFormat::Float => FORMAT_IEEE_FLOAT,
            },
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            data_bytes: frames * bytes_per_frame,
            frames,
        })
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames as f64 / f64::from(self.sample_rate))
    }
}

impl fmt::Display for WavInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WaveHeader format={} numChannels={} sampleRate={} bitsPerSample={} numBytes={} duration={:.3}s",
            self.format,
            self.channels,
            self.sample_rate,
            self.bits_per_sample,
            self.data_bytes,
            self.duration().as_secs_f64()
        )
    }
}

//! OboeRecorder - Oboe-based microphone recording for Android
//!
//! Opens a low-latency input stream via oboe-rs (AAudio/OpenSL ES backends)
//! and streams the captured frames into a 16-bit PCM WAV file.
//!
//! Architecture:
//! - Input callback (real-time thread): copies frames into pooled buffers
//! - Writer thread: drains filled buffers into the WAV file
//!
//! The callback performs no allocation, locking or blocking I/O; all buffers
//! are pre-allocated by the BufferPool before the stream is started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use oboe::{
    AudioInputCallback, AudioInputStreamSafe, AudioStream, AudioStreamAsync, AudioStreamBase,
    AudioStreamBuilder, DataCallbackResult, Input, Mono, SharingMode,
};

use super::{Recorder, RecordingRequest, RecordingSummary};
use crate::audio::buffer_pool::BufferPool;
use crate::audio::capture::{CaptureProducer, CaptureWriter};
use crate::audio::wav::WavSink;
use crate::config::{InputPreset, PerformanceMode, RecorderConfig};
use crate::error::{log_recorder_error, RecorderError};

/// Input audio callback feeding the capture pipeline
pub struct InputCallback {
    producer: CaptureProducer,
}

impl AudioInputCallback for InputCallback {
    type FrameType = (f32, Mono);

    fn on_audio_ready(
        &mut self,
        _stream: &mut dyn AudioInputStreamSafe,
        frames: &[f32],
    ) -> DataCallbackResult {
        // Real-time audio callback - NO ALLOCATIONS, LOCKS, OR BLOCKING!
        self.producer.push_interleaved(frames, 1);
        DataCallbackResult::Continue
    }
}

impl From<InputPreset> for oboe::InputPreset {
    fn from(preset: InputPreset) -> Self {
        match preset {
            InputPreset::Generic => oboe::InputPreset::Generic,
            InputPreset::Camcorder => oboe::InputPreset::Camcorder,
            InputPreset::VoiceRecognition => oboe::InputPreset::VoiceRecognition,
            InputPreset::VoiceCommunication => oboe::InputPreset::VoiceCommunication,
            InputPreset::Unprocessed => oboe::InputPreset::Unprocessed,
            InputPreset::VoicePerformance => oboe::InputPreset::VoicePerformance,
        }
    }
}

impl From<PerformanceMode> for oboe::PerformanceMode {
    fn from(mode: PerformanceMode) -> Self {
        match mode {
            PerformanceMode::None => oboe::PerformanceMode::None,
            PerformanceMode::PowerSaving => oboe::PerformanceMode::PowerSaving,
            PerformanceMode::LowLatency => oboe::PerformanceMode::LowLatency,
        }
    }
}

struct OboeSession {
    request: RecordingRequest,
    stream: AudioStreamAsync<Input, InputCallback>,
    writer: CaptureWriter,
    dropped_frames: Arc<AtomicU64>,
}

/// Recorder driving an Oboe input stream
///
/// Owned by the bridge; one recording at a time.
pub struct OboeRecorder {
    config: RecorderConfig,
    session: Mutex<Option<OboeSession>>,
}

impl OboeRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<OboeSession>>, RecorderError> {
        self.session.lock().map_err(|_| RecorderError::LockPoisoned {
            component: "oboe_session".to_string(),
        })
    }

    /// Create and open the input stream with the capture callback
    fn open_input_stream(
        &self,
        request: &RecordingRequest,
        producer: CaptureProducer,
    ) -> Result<AudioStreamAsync<Input, InputCallback>, RecorderError> {
        AudioStreamBuilder::default()
            .set_performance_mode(request.performance_mode.into())
            .set_sharing_mode(SharingMode::Exclusive)
            .set_direction::<Input>()
            .set_input_preset(request.input_preset.into())
            .set_sample_rate(request.sample_rate as i32)
            .set_channel_count::<Mono>()
            .set_format::<f32>()
            .set_callback(InputCallback { producer })
            .open_stream()
            .map_err(|e| RecorderError::StreamOpenFailed {
                reason: format!("Input stream: {:?}", e),
            })
    }
}

impl Recorder for OboeRecorder {
    fn start(&self, request: &RecordingRequest) -> Result<(), RecorderError> {
        // Pool construction panics on zero sizing; refuse before taking the lock
        self.config.validate()?;
        let mut guard = self.lock_session()?;
        if guard.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }

        let (audio_channels, writer_channels) =
            BufferPool::new(self.config.buffer_pool_size, self.config.buffer_size).split();
        let producer = CaptureProducer::new(audio_channels);
        let dropped_frames = producer.dropped_frames_ref();

        let mut stream = self.open_input_stream(request, producer)?;

        let actual_rate = stream.get_sample_rate();
        if actual_rate != request.sample_rate as i32 {
            tracing::warn!(
                "[OboeRecorder] Requested {} Hz, stream opened at {} Hz",
                request.sample_rate,
                actual_rate
            );
        }

        let sink = WavSink::create(&request.path, request.sample_rate)?;
        let writer = CaptureWriter::spawn(
            writer_channels,
            sink,
            Duration::from_millis(self.config.writer_poll_interval_ms),
        )?;

        if let Err(e) = stream.start() {
            let err = RecorderError::HardwareError {
                details: format!("Failed to start input stream: {:?}", e),
            };
            drop(stream);
            if let Err(cleanup) = writer.finish() {
                log_recorder_error(&cleanup, "oboe_start_cleanup");
            }
            let _ = std::fs::remove_file(&request.path);
            return Err(err);
        }

        tracing::info!(
            "[OboeRecorder] Recording to {} at {} Hz (preset={}, mode={})",
            request.path.display(),
            request.sample_rate,
            request.input_preset,
            request.performance_mode
        );

        *guard = Some(OboeSession {
            request: request.clone(),
            stream,
            writer,
            dropped_frames,
        });
        Ok(())
    }

    fn stop(&self) -> Result<RecordingSummary, RecorderError> {
        let mut session = self.lock_session()?.take().ok_or(RecorderError::NotRecording)?;

        let stop_result = session.stream.stop();
        // Closing the stream releases the callback before the writer drains
        drop(session.stream);

        let frames = session.writer.finish()?;
        stop_result.map_err(|e| RecorderError::HardwareError {
            details: format!("Failed to stop input stream: {:?}", e),
        })?;
        Ok(RecordingSummary::new(
            &session.request,
            frames,
            session.dropped_frames.load(Ordering::Relaxed),
        ))
    }

    fn is_recording(&self) -> bool {
        self.lock_session()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

//! CPAL-based recorder for desktop platforms (Linux, macOS, Windows)
//!
//! `cpal::Stream` is not `Send` on every host, so each recording owns a
//! dedicated stream thread. `start` blocks until that thread reports the
//! stream is playing (or failed to open); `stop` signals the thread to drop
//! the stream and then finalizes the WAV writer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::{Recorder, RecordingRequest, RecordingSummary};
use crate::audio::buffer_pool::BufferPool;
use crate::audio::capture::{CaptureProducer, CaptureWriter};
use crate::audio::wav::WavSink;
use crate::config::RecorderConfig;
use crate::error::{log_recorder_error, RecorderError};

struct CpalSession {
    request: RecordingRequest,
    stop_tx: mpsc::Sender<()>,
    stream_thread: JoinHandle<()>,
    writer: CaptureWriter,
    dropped_frames: Arc<AtomicU64>,
}

pub struct CpalRecorder {
    config: RecorderConfig,
    session: Mutex<Option<CpalSession>>,
}

impl CpalRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<CpalSession>>, RecorderError> {
        self.session.lock().map_err(|_| RecorderError::LockPoisoned {
            component: "cpal_session".to_string(),
        })
    }

    fn spawn_stream_thread(
        sample_rate: u32,
        producer: CaptureProducer,
    ) -> Result<(mpsc::Sender<()>, JoinHandle<()>), RecorderError> {
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), RecorderError>>(1);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("cpal-input".to_string())
            .spawn(move || {
                let stream = match open_input_stream(sample_rate, producer) {
                    Ok(stream) => stream,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if let Err(err) = stream.play() {
                    let _ = ready_tx.send(Err(RecorderError::HardwareError {
                        details: format!("Input start failed: {}", err),
                    }));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                // Sender dropped or stop requested: either way the stream goes
                let _ = stop_rx.recv();
                drop(stream);
                tracing::debug!("[CpalRecorder] Input stream closed");
            })
            .map_err(|err| RecorderError::StreamFailure {
                reason: format!("Failed to spawn input thread: {}", err),
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok((stop_tx, handle)),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(RecorderError::StreamFailure {
                    reason: "Input thread exited before reporting readiness".to_string(),
                })
            }
        }
    }
}

/// Open the default input device at `sample_rate`, f32 samples
fn open_input_stream(
    sample_rate: u32,
    mut producer: CaptureProducer,
) -> Result<cpal::Stream, RecorderError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| RecorderError::StreamOpenFailed {
            reason: "No default input device found".to_string(),
        })?;

    let supported = device
        .supported_input_configs()
        .map_err(|e| RecorderError::StreamOpenFailed {
            reason: format!("Failed to query input configs: {:?}", e),
        })?
        .filter(|range| range.sample_format() == cpal::SampleFormat::F32)
        .filter(|range| {
            range.min_sample_rate().0 <= sample_rate && sample_rate <= range.max_sample_rate().0
        })
        .min_by_key(|range| range.channels())
        .ok_or_else(|| RecorderError::StreamOpenFailed {
            reason: format!("No f32 input configuration supports {} Hz", sample_rate),
        })?
        .with_sample_rate(cpal::SampleRate(sample_rate));

    let stream_config: cpal::StreamConfig = supported.config();
    let channels_count = stream_config.channels as usize;

    tracing::info!(
        "[CpalRecorder] Opening {:?} at {} Hz, {} channel(s)",
        device.name().unwrap_or_else(|_| "unknown device".to_string()),
        sample_rate,
        channels_count
    );

    device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                producer.push_interleaved(data, channels_count);
            },
            |err| tracing::error!("[CpalRecorder] Input stream error: {}", err),
            None,
        )
        .map_err(|e| RecorderError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })
}

impl Recorder for CpalRecorder {
    fn start(&self, request: &RecordingRequest) -> Result<(), RecorderError> {
        // Pool construction panics on zero sizing; refuse before taking the lock
        self.config.validate()?;
        let mut guard = self.lock_session()?;
        if guard.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }

        let (audio_channels, writer_channels) =
            BufferPool::new(self.config.buffer_pool_size, self.config.buffer_size).split();

        let sink = WavSink::create(&request.path, request.sample_rate)?;
        let writer = CaptureWriter::spawn(
            writer_channels,
            sink,
            Duration::from_millis(self.config.writer_poll_interval_ms),
        )?;

        let producer = CaptureProducer::new(audio_channels);
        let dropped_frames = producer.dropped_frames_ref();
        let (stop_tx, stream_thread) =
            match Self::spawn_stream_thread(request.sample_rate, producer) {
                Ok(parts) => parts,
                Err(err) => {
                    if let Err(cleanup) = writer.finish() {
                        log_recorder_error(&cleanup, "cpal_start_cleanup");
                    }
                    let _ = std::fs::remove_file(&request.path);
                    return Err(err);
                }
            };

        tracing::info!(
            "[CpalRecorder] Recording to {} at {} Hz",
            request.path.display(),
            request.sample_rate
        );

        *guard = Some(CpalSession {
            request: request.clone(),
            stop_tx,
            stream_thread,
            writer,
            dropped_frames,
        });
        Ok(())
    }

    fn stop(&self) -> Result<RecordingSummary, RecorderError> {
        let session = self.lock_session()?.take().ok_or(RecorderError::NotRecording)?;

        let _ = session.stop_tx.send(());
        let joined = session.stream_thread.join();

        // Finalize the file even if the input thread died
        let frames = session.writer.finish()?;
        joined.map_err(|_| RecorderError::StreamFailure {
            reason: "Input thread panicked".to_string(),
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

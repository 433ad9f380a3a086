//! Capture pipeline between the real-time input callback and the WAV file
//!
//! ```text
//! input callback ──push_interleaved──> DATA_QUEUE ──> writer thread ──> WavSink
//!        ^                                                  │
//!        └──────────────────── POOL_QUEUE <─────────────────┘
//! ```
//!
//! The callback side never allocates, locks or blocks: when no pooled buffer is
//! free the frames are dropped and counted instead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::buffer_pool::{AudioThreadChannels, WriterThreadChannels};
use super::wav::{discard_on_error, WavSink};
use crate::error::RecorderError;

/// Callback-side half of the pipeline
pub struct CaptureProducer {
    channels: AudioThreadChannels,
    dropped_frames: Arc<AtomicU64>,
}

impl CaptureProducer {
    pub fn new(channels: AudioThreadChannels) -> Self {
        Self {
            channels,
            dropped_frames: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared counter of frames lost to pool exhaustion
    pub fn dropped_frames_ref(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped_frames)
    }

    /// Queue interleaved frames, keeping the first channel of each frame
    ///
    /// Returns the number of frames handed to the writer.
    pub fn push_interleaved(&mut self, data: &[f32], channels: usize) -> usize {
        let channels = channels.max(1);
        let mut frames = data.chunks(channels).map(|frame| frame[0]).peekable();
        let mut pushed = 0;

        while frames.peek().is_some() {
            let mut buffer = match self.channels.pool_consumer.pop() {
                Ok(buffer) => buffer,
                Err(_) => {
                    let remaining = frames.count() as u64;
                    self.dropped_frames.fetch_add(remaining, Ordering::Relaxed);
                    break;
                }
            };

            buffer.clear();
            let capacity = buffer.capacity();
            buffer.extend(frames.by_ref().take(capacity));
            let len = buffer.len();

            match self.channels.data_producer.push(buffer) {
                Ok(()) => pushed += len,
                Err(_) => {
                    self.dropped_frames.fetch_add(len as u64, Ordering::Relaxed);
                }
            }
        }

        pushed
    }
}

/// Writer thread draining captured buffers into a [`WavSink`]
pub struct CaptureWriter {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Result<u64, RecorderError>>,
}

impl CaptureWriter {
    pub fn spawn(
        channels: WriterThreadChannels,
        sink: WavSink,
        poll_interval: Duration,
    ) -> Result<Self, RecorderError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let path = sink.path().to_path_buf();

        let spawned = thread::Builder::new()
            .name("wav-writer".to_string())
            .spawn(move || run_writer(channels, sink, stop_flag, poll_interval))
            .map_err(|err| RecorderError::StreamFailure {
                reason: format!("Failed to spawn writer thread: {}", err),
            });
        // The sink never reached a thread, so only its header is on disk
        let handle = discard_on_error(&path, spawned)?;

        Ok(Self { stop, handle })
    }

    /// Stop the thread once the queue is drained and finalize the file
    ///
    /// Returns the number of frames written.
    pub fn finish(self) -> Result<u64, RecorderError> {
        self.stop.store(true, Ordering::Release);
        self.handle
            .join()
            .map_err(|_| RecorderError::StreamFailure {
                reason: "WAV writer thread panicked".to_string(),
            })?
    }
}

fn run_writer(
    mut channels: WriterThreadChannels,
    mut sink: WavSink,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) -> Result<u64, RecorderError> {
    tracing::debug!("[WavWriter] Writing to {}", sink.path().display());

    loop {
        // Read the flag before draining so frames queued ahead of stop() are kept
        let stopping = stop.load(Ordering::Acquire);

        while let Ok(mut buffer) = channels.data_consumer.pop() {
            sink.write_samples(&buffer)?;
            buffer.clear();
            let _ = channels.pool_producer.push(buffer);
        }

        if stopping {
            break;
        }
        thread::sleep(poll_interval);
    }

    let frames = sink.finalize()?;
    tracing::info!("[WavWriter] Finalized recording with {} frames", frames);
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::buffer_pool::BufferPool;
    use crate::audio::wav::WavInfo;

    #[test]
    fn test_push_mono_fills_buffers() {
        let (audio, mut writer) = BufferPool::new(4, 8).split();
        let mut producer = CaptureProducer::new(audio);

        let pushed = producer.push_interleaved(&[0.1; 20], 1);
        assert_eq!(pushed, 20);

        let mut total = 0;
        while let Ok(buffer) = writer.data_consumer.pop() {
            assert!(buffer.len() <= buffer.capacity());
            total += buffer.len();
        }
        assert_eq!(total, 20);
    }

    #[test]
    fn test_push_interleaved_keeps_first_channel() {
        let (audio, mut writer) = BufferPool::new(2, 16).split();
        let mut producer = CaptureProducer::new(audio);

        let stereo = [0.5, -0.5, 0.25, -0.25, 0.125, -0.125];
        assert_eq!(producer.push_interleaved(&stereo, 2), 3);

        let buffer = writer.data_consumer.pop().unwrap();
        assert_eq!(buffer, vec![0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_pool_exhaustion_drops_frames() {
        let (audio, _writer) = BufferPool::new(1, 4).split();
        let mut producer = CaptureProducer::new(audio);
        let dropped = producer.dropped_frames_ref();

        let pushed = producer.push_interleaved(&[0.0; 10], 1);
        assert!(pushed >= 4);
        assert_eq!(pushed as u64 + dropped.load(Ordering::Relaxed), 10);

        // Nothing recycled yet, so everything further is dropped
        assert_eq!(producer.push_interleaved(&[0.0; 3], 1), 0);
        assert_eq!(pushed as u64 + dropped.load(Ordering::Relaxed), 13);
    }

    #[test]
    fn test_writer_drains_queue_before_finishing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");

        let (audio, writer_channels) = BufferPool::new(8, 64).split();
        let mut producer = CaptureProducer::new(audio);

        let sink = WavSink::create(&path, 16000).unwrap();
        let writer =
            CaptureWriter::spawn(writer_channels, sink, Duration::from_millis(1)).unwrap();

        for _ in 0..4 {
            producer.push_interleaved(&[0.5; 100], 1);
            std::thread::sleep(Duration::from_millis(5));
        }
        let frames = writer.finish().unwrap();
        assert_eq!(frames, 400);

        let info = WavInfo::read(&path).unwrap();
        assert_eq!(info.frames, 400);
        assert_eq!(info.sample_rate, 16000);
    }
}

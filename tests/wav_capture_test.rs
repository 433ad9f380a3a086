//! Integration tests for the capture pipeline
//!
//! Feeds synthetic callback data through CaptureProducer and CaptureWriter
//! into a real WAV file and checks what lands on disk.

use std::time::Duration;

use tempfile::tempdir;
use testoboe::audio::{BufferPool, CaptureProducer, CaptureWriter, WavInfo, WavSink};
use testoboe::audio::wav::{FORMAT_PCM, RECORDING_BITS_PER_SAMPLE, RECORDING_CHANNELS};

#[test]
fn test_mono_capture_to_wav() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.wav");

    let (audio_channels, writer_channels) = BufferPool::new(16, 256).split();
    let mut producer = CaptureProducer::new(audio_channels);
    let dropped = producer.dropped_frames_ref();
    let sink = WavSink::create(&path, 48000).unwrap();
    let writer = CaptureWriter::spawn(writer_channels, sink, Duration::from_millis(1)).unwrap();

    let block = vec![0.25f32; 480];
    let mut pushed = 0;
    for _ in 0..10 {
        pushed += producer.push_interleaved(&block, 1);
        std::thread::sleep(Duration::from_millis(2));
    }

    let frames = writer.finish().unwrap();
    let lost = dropped.load(std::sync::atomic::Ordering::Relaxed);
    assert_eq!(pushed as u64 + lost, 4800);
    assert_eq!(frames, pushed as u64);

    let info = WavInfo::read(&path).unwrap();
    assert_eq!(info.format, FORMAT_PCM);
    assert_eq!(info.channels, RECORDING_CHANNELS);
    assert_eq!(info.sample_rate, 48000);
    assert_eq!(info.bits_per_sample, RECORDING_BITS_PER_SAMPLE);
    assert_eq!(info.frames, frames);
    assert_eq!(info.data_bytes, frames * 2);
}

#[test]
fn test_stereo_input_keeps_first_channel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stereo.wav");

    let (audio_channels, writer_channels) = BufferPool::new(4, 64).split();
    let mut producer = CaptureProducer::new(audio_channels);
    let sink = WavSink::create(&path, 16000).unwrap();
    let writer = CaptureWriter::spawn(writer_channels, sink, Duration::from_millis(1)).unwrap();

    // Left = 0.5, right = -0.5
    let interleaved: Vec<f32> = (0..64).flat_map(|_| [0.5f32, -0.5f32]).collect();
    assert_eq!(producer.push_interleaved(&interleaved, 2), 64);

    assert_eq!(writer.finish().unwrap(), 64);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 64);
    assert!(samples.iter().all(|s| *s > 0));
}

#[test]
fn test_empty_recording_is_valid_wav() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.wav");

    let (_audio_channels, writer_channels) = BufferPool::new(2, 32).split();
    let sink = WavSink::create(&path, 44100).unwrap();
    let writer = CaptureWriter::spawn(writer_channels, sink, Duration::from_millis(1)).unwrap();

    assert_eq!(writer.finish().unwrap(), 0);

    let info = WavInfo::read(&path).unwrap();
    assert_eq!(info.frames, 0);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 44);
}

// Audio module - capture pipeline and WAV output

pub mod buffer_pool;
pub mod capture;
pub mod wav;

// Re-export commonly used types for convenience
pub use buffer_pool::{
    AudioBuffer, BufferPool, BufferPoolChannels, DEFAULT_BUFFER_COUNT, DEFAULT_BUFFER_SIZE,
};
pub use capture::{CaptureProducer, CaptureWriter};
pub use wav::{WavInfo, WavSink};

// BufferPool - lock-free buffer pool with dual SPSC queues
//
// Object pool built from two lock-free SPSC ring buffers so the recording
// callback never allocates. The writer thread owns the file; the callback only
// moves pre-allocated buffers around.
//
// Buffer flow:
// 1. Audio thread pops an empty buffer from POOL_QUEUE
// 2. Audio thread copies captured frames into it
// 3. Audio thread pushes the filled buffer to DATA_QUEUE
// 4. Writer thread pops the filled buffer and appends it to the WAV file
// 5. Writer thread clears the buffer and pushes it back to POOL_QUEUE

use rtrb::{Consumer, Producer};

pub const DEFAULT_BUFFER_COUNT: usize = 64;
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Audio buffer type - pre-allocated vector of f32 samples
pub type AudioBuffer = Vec<f32>;

/// All four queue endpoints, before they are handed to their threads
pub struct BufferPoolChannels {
    /// Producer for sending filled audio buffers to the writer thread
    pub data_producer: Producer<AudioBuffer>,
    /// Consumer for receiving filled audio buffers in the writer thread
    pub data_consumer: Consumer<AudioBuffer>,
    /// Producer for returning empty buffers from the writer thread
    pub pool_producer: Producer<AudioBuffer>,
    /// Consumer for retrieving empty buffers in the audio thread
    pub pool_consumer: Consumer<AudioBuffer>,
}

/// Endpoints owned by the audio callback
pub struct AudioThreadChannels {
    pub data_producer: Producer<AudioBuffer>,
    pub pool_consumer: Consumer<AudioBuffer>,
}

/// Endpoints owned by the writer thread
pub struct WriterThreadChannels {
    pub data_consumer: Consumer<AudioBuffer>,
    pub pool_producer: Producer<AudioBuffer>,
}

impl BufferPoolChannels {
    pub fn split(self) -> (AudioThreadChannels, WriterThreadChannels) {
        (
            AudioThreadChannels {
                data_producer: self.data_producer,
                pool_consumer: self.pool_consumer,
            },
            WriterThreadChannels {
                data_consumer: self.data_consumer,
                pool_producer: self.pool_producer,
            },
        )
    }
}

/// Lock-free buffer pool using dual SPSC ring buffers
///
/// Both queues have room for every buffer, so a push onto either queue can
/// only fail if a buffer was fabricated outside the pool.
pub struct BufferPool;

impl BufferPool {
    /// Create a new BufferPool with `buffer_count` empty buffers of
    /// `buffer_size` frames capacity each
    ///
    /// # Panics
    /// Panics if buffer_count is 0 or buffer_size is 0
    #[allow(clippy::new_ret_no_self)]
    pub fn new(buffer_count: usize, buffer_size: usize) -> BufferPoolChannels {
        assert!(buffer_count > 0, "buffer_count must be greater than 0");
        assert!(buffer_size > 0, "buffer_size must be greater than 0");

        let (mut pool_producer, pool_consumer) = rtrb::RingBuffer::new(buffer_count);
        let (data_producer, data_consumer) = rtrb::RingBuffer::new(buffer_count);

        for _ in 0..buffer_count {
            let buffer: AudioBuffer = Vec::with_capacity(buffer_size);
            pool_producer
                .push(buffer)
                .expect("pool queue sized for every buffer");
        }

        BufferPoolChannels {
            data_producer,
            data_consumer,
            pool_producer,
            pool_consumer,
        }
    }
}

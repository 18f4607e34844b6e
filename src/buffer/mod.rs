//! Chunk buffers and the pool that issues them.
//!
//! - [`ChunkBuffer`] - Fixed-capacity staging buffer with a write-then-read
//!   life cycle and an ordering index
//! - [`BufferPool`] - Thread-safe issue/reclaim of buffer storage

mod chunk;
mod pool;

pub use chunk::ChunkBuffer;
pub use pool::{BufferPool, PoolStats};

#[cfg(feature = "async-io")]
pub(crate) use chunk::FILL_BLOCK_SIZE;

//! chunkpool
//!
//! Pooled fixed-capacity chunk buffers for Rust.
//!
//! `chunkpool` stages chunks of a byte stream between a producer (e.g., a
//! remote object fetch) and a consumer that must process chunks in a defined
//! order. Each [`ChunkBuffer`] goes through a write-then-read life cycle:
//! fill from a reader, flip to readable, drain in order (with mark/reset
//! replay for retries), then release its storage back to a thread-safe
//! [`BufferPool`] for reuse. Buffers carry an immutable sequence index so a
//! set processed out of arrival order can be sorted back into place.
//!
//! The crate intentionally:
//! - does NOT perform network I/O
//! - does NOT decide chunk sizes or concurrency levels
//! - does NOT reassemble chunks (it only provides the ordering key)
//! - does NOT persist buffers
//!
//! It only does one thing: **stage bytes between a stream and an ordered consumer**
//!
//! # Sync
//!
//! ```
//! use chunkpool::{BufferPool, BufferError, PoolConfig};
//!
//! fn main() -> Result<(), BufferError> {
//!     let pool = BufferPool::new(PoolConfig::new(16)?);
//!
//!     let mut buffer = pool.create(0)?;
//!     buffer.fill(&mut &b"ABCDEFGHIJ"[..])?;
//!     buffer.make_readable()?;
//!
//!     let mut out = [0u8; 5];
//!     while buffer.has_remaining() {
//!         let n = buffer.get_bytes(&mut out)?;
//!         println!("drained {} bytes", n);
//!     }
//!     buffer.release();
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use chunkpool::{split_async, BufferPool};
//!
//! async fn demo<R: futures_io::AsyncRead>(pool: &BufferPool, reader: R)
//!     -> Result<(), chunkpool::BufferError>
//! {
//!     let mut stream = split_async(pool, reader);
//!
//!     while let Some(buffer) = stream.next().await {
//!         let buffer = buffer?;
//!         println!("chunk {} holds {} bytes", buffer.index(), buffer.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod split;

#[cfg(feature = "async-io")]
mod async_split;

//
// Public surface (intentionally tiny)
//

pub use buffer::{BufferPool, ChunkBuffer, PoolStats};
pub use config::PoolConfig;
pub use error::BufferError;
pub use split::SplitIter;

#[cfg(feature = "async-io")]
pub use async_split::{SplitStream, split_async};

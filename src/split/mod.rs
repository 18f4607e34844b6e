//! Splitting a byte stream into an ordered sequence of chunk buffers.
//!
//! - [`SplitIter`] - Iterator that stages a [`std::io::Read`] source as
//!   consecutive pool-issued buffers
//!
//! Created via [`BufferPool::split`](crate::BufferPool::split).

mod iter;

pub use iter::SplitIter;

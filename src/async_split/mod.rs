//! Async splitting of a byte stream into chunk buffers.
//!
//! This module provides the asynchronous twin of
//! [`BufferPool::split`](crate::BufferPool::split) using the
//! `futures-io::AsyncRead` trait, making it runtime-agnostic and compatible
//! with tokio, async-std, smol, and other async runtimes.
//!
//! - [`split_async`] - Creates a stream of filled buffers from an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{SplitStream, split_async};

//! Async splitter - stages an async reader as consecutive chunk buffers.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use chunkpool::{split_async, BufferPool};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(pool: &BufferPool, reader: R)
//!     -> Result<(), chunkpool::BufferError>
//! {
//!     let mut stream = split_async(pool, reader);
//!
//!     while let Some(buffer) = stream.next().await {
//!         let buffer = buffer?;
//!         println!("chunk {}: {} bytes", buffer.index(), buffer.remaining());
//!         buffer.release();
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::buffer::{BufferPool, ChunkBuffer, FILL_BLOCK_SIZE};
use crate::error::BufferError;

pin_project! {
    /// A stream that yields filled, readable chunk buffers from an async
    /// reader.
    ///
    /// Semantics match [`SplitIter`](crate::SplitIter): buffers are filled
    /// to the pool's configured capacity (the last may be shorter), flipped
    /// to readable, and tagged with consecutive indices from 0. End-of-data
    /// ends the stream; a read failure is yielded once and fuses it.
    ///
    /// Uses `futures_io::AsyncRead`, which is runtime-agnostic. Works with
    /// tokio, async-std, smol, or any futures-compatible runtime.
    pub struct SplitStream<R> {
        #[pin]
        reader: R,
        pool: BufferPool,
        current: Option<ChunkBuffer>,
        scratch: Vec<u8>,
        next_index: u64,
        finished: bool,
    }
}

impl<R: AsyncRead> Stream for SplitStream<R> {
    type Item = Result<ChunkBuffer, BufferError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            let mut buffer = match this.current.take() {
                Some(buffer) => buffer,
                None => match this.pool.create(*this.next_index) {
                    Ok(buffer) => {
                        *this.next_index += 1;
                        buffer
                    }
                    Err(e) => {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                },
            };

            let want = buffer.remaining_capacity().min(this.scratch.len());
            match this.reader.as_mut().poll_read(cx, &mut this.scratch[..want]) {
                Poll::Pending => {
                    *this.current = Some(buffer);
                    return Poll::Pending;
                }
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(Ok(0)) => {
                    // End of stream - yield the partial buffer if any
                    *this.finished = true;
                    return if buffer.is_empty() {
                        Poll::Ready(None)
                    } else {
                        Poll::Ready(Some(flip(buffer)))
                    };
                }
                Poll::Ready(Ok(n)) => {
                    if let Err(e) = buffer.put_slice(&this.scratch[..n]) {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    if buffer.remaining_capacity() == 0 {
                        return Poll::Ready(Some(flip(buffer)));
                    }
                    *this.current = Some(buffer);
                }
            }
        }
    }
}

fn flip(mut buffer: ChunkBuffer) -> Result<ChunkBuffer, BufferError> {
    buffer.make_readable()?;
    Ok(buffer)
}

/// Creates a stream of filled, readable buffers from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, `tokio_util::compat` converts `tokio::io::AsyncRead`
/// into `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use chunkpool::{split_async, BufferPool};
///
/// let reader = tokio::fs::File::open("object.bin").await?;
/// let stream = split_async(&pool, reader.compat());
/// ```
pub fn split_async<R: AsyncRead>(pool: &BufferPool, reader: R) -> SplitStream<R> {
    SplitStream {
        reader,
        pool: pool.clone(),
        current: None,
        scratch: vec![0u8; FILL_BLOCK_SIZE],
        next_index: 0,
        finished: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use futures_util::StreamExt;
    use tokio_util::compat::TokioAsyncReadCompatExt;

    fn pool(capacity: usize) -> BufferPool {
        BufferPool::new(PoolConfig::new(capacity).unwrap())
    }

    fn drain(buffer: &mut ChunkBuffer) -> Vec<u8> {
        let mut out = vec![0u8; buffer.remaining()];
        let n = buffer.get_bytes(&mut out).unwrap();
        out.truncate(n);
        out
    }

    #[tokio::test]
    async fn test_split_stream_empty() {
        let pool = pool(4);
        let reader: &[u8] = &[];
        let mut stream = split_async(&pool, reader);
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_split_stream_framing() {
        let pool = pool(4);
        let reader: &[u8] = b"ABCDEFGHIJ";
        let stream = split_async(&pool, reader);

        let buffers: Vec<_> = stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let lens: Vec<_> = buffers.iter().map(|b| b.remaining()).collect();
        assert_eq!(lens, vec![4, 4, 2]);

        let indices: Vec<_> = buffers.iter().map(|b| b.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let mut concat = Vec::new();
        for mut buffer in buffers {
            concat.extend(drain(&mut buffer));
        }
        assert_eq!(concat, b"ABCDEFGHIJ");
    }

    #[tokio::test]
    async fn test_split_stream_chunked_delivery() {
        // The reader delivers in fragments that do not line up with the
        // buffer capacity; framing must come out identical anyway.
        let pool = pool(4);
        let reader = tokio_test::io::Builder::new()
            .read(b"AB")
            .read(b"CDE")
            .read(b"FGHIJ")
            .build()
            .compat();

        let buffers: Vec<_> = split_async(&pool, reader)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let lens: Vec<_> = buffers.iter().map(|b| b.remaining()).collect();
        assert_eq!(lens, vec![4, 4, 2]);

        let mut concat = Vec::new();
        for mut buffer in buffers {
            concat.extend(drain(&mut buffer));
        }
        assert_eq!(concat, b"ABCDEFGHIJ");
    }

    #[tokio::test]
    async fn test_split_stream_error_fuses() {
        let pool = pool(8);
        let reader = tokio_test::io::Builder::new()
            .read(b"ABCD")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "lost",
            ))
            .build()
            .compat();

        let mut stream = split_async(&pool, reader);
        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(BufferError::Io(_))));
        assert!(stream.next().await.is_none());
    }
}

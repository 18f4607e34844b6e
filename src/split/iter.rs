//! Sync splitter - stages a reader as consecutive chunk buffers.

use std::io::Read;

use crate::buffer::{BufferPool, ChunkBuffer};
use crate::error::BufferError;

impl BufferPool {
    /// Splits a reader into an ordered sequence of readable buffers.
    ///
    /// Each yielded buffer is filled to the pool's configured capacity (the
    /// last may be shorter), flipped to readable, and tagged with
    /// consecutive indices starting at 0. The caller drains each buffer and
    /// releases it; out-of-order processing can be restored later by sorting
    /// on the index.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkpool::{BufferPool, PoolConfig};
    ///
    /// # fn main() -> Result<(), chunkpool::BufferError> {
    /// let pool = BufferPool::new(PoolConfig::new(4)?);
    ///
    /// let mut total = 0;
    /// for buffer in pool.split(&b"ABCDEFGHIJ"[..]) {
    ///     let buffer = buffer?;
    ///     total += buffer.remaining();
    ///     buffer.release();
    /// }
    /// assert_eq!(total, 10);
    /// # Ok(())
    /// # }
    /// ```
    pub fn split<R: Read>(&self, reader: R) -> SplitIter<R> {
        SplitIter {
            pool: self.clone(),
            reader,
            next_index: 0,
            finished: false,
        }
    }
}

/// An iterator that yields filled, readable chunk buffers from a reader.
///
/// Ends on end-of-data; a read failure is yielded once as an error and
/// terminates the iterator. Buffers the iterator had to abandon on the way
/// (e.g., partially filled when the error struck) return to the pool
/// automatically.
pub struct SplitIter<R> {
    pool: BufferPool,
    reader: R,
    next_index: u64,
    finished: bool,
}

impl<R: Read> Iterator for SplitIter<R> {
    type Item = Result<ChunkBuffer, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut buffer = match self.pool.create(self.next_index) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        match buffer.fill(&mut self.reader) {
            Ok(0) => {
                // End of stream; the empty buffer goes straight back
                self.finished = true;
                None
            }
            Ok(_) => {
                self.next_index += 1;
                match buffer.make_readable() {
                    Ok(()) => Some(Ok(buffer)),
                    Err(e) => {
                        self.finished = true;
                        Some(Err(e))
                    }
                }
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;

    fn pool(capacity: usize) -> BufferPool {
        BufferPool::new(PoolConfig::new(capacity).unwrap())
    }

    fn drain(buffer: &mut ChunkBuffer) -> Vec<u8> {
        let mut out = vec![0u8; buffer.remaining()];
        let n = buffer.get_bytes(&mut out).unwrap();
        out.truncate(n);
        out
    }

    #[test]
    fn test_split_empty_source() {
        let pool = pool(4);
        let mut iter = pool.split(&b""[..]);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none(), "iterator stays fused after the end");
    }

    #[test]
    fn test_split_framing_and_indices() {
        let pool = pool(4);
        let buffers: Vec<_> = pool
            .split(&b"ABCDEFGHIJ"[..])
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let lens: Vec<_> = buffers.iter().map(|b| b.remaining()).collect();
        assert_eq!(lens, vec![4, 4, 2], "full buffers then a short tail");

        let indices: Vec<_> = buffers.iter().map(|b| b.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let mut concat = Vec::new();
        for mut buffer in buffers {
            concat.extend(drain(&mut buffer));
        }
        assert_eq!(concat, b"ABCDEFGHIJ");
    }

    #[test]
    fn test_split_source_shorter_than_capacity() {
        let pool = pool(64);
        let buffers: Vec<_> = pool
            .split(&b"tiny"[..])
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].remaining(), 4);
    }

    #[test]
    fn test_split_reuses_released_buffers() {
        let pool = pool(4);
        let data = vec![0xA5u8; 40];

        for buffer in pool.split(&data[..]) {
            buffer.unwrap().release();
        }

        // 10 yielded buffers plus the end-of-stream probe; only the first
        // needed a fresh allocation.
        let stats = pool.stats();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.reuses, 10);
    }

    #[test]
    fn test_split_error_terminates() {
        struct HalfThenFail(bool);
        impl Read for HalfThenFail {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.0 {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::ConnectionAborted,
                        "lost",
                    ));
                }
                self.0 = true;
                let n = buf.len().min(4);
                buf[..n].fill(0x42);
                Ok(n)
            }
        }

        let pool = pool(8);
        let mut iter = pool.split(HalfThenFail(false));

        let first = iter.next().unwrap();
        assert!(matches!(first, Err(BufferError::Io(_))));
        assert!(iter.next().is_none(), "error fuses the iterator");
    }
}

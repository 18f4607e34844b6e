//! The ChunkBuffer type - a fixed-capacity staging buffer for one chunk.

use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::mem;
use std::sync::Weak;

use bytes::{BufMut, BytesMut};

use super::pool::PoolShared;
use crate::error::BufferError;

/// Size of the scratch block used to move bytes from a reader into a buffer.
pub(crate) const FILL_BLOCK_SIZE: usize = 8192;

/// The buffer's cursor, tagged by life-cycle phase.
///
/// Exactly one phase is active at a time; the transition is one-way per
/// use-cycle (fill, flip, drain). Keeping the phases as separate variants
/// makes fill-after-flip and read-before-flip rejectable instead of
/// silently producing wrong offsets.
enum Cursor {
    /// Accepting writes; the write position is the storage length.
    Fillable,
    /// Finalized for reading; `pos` is the next unread byte, the readable
    /// limit is the storage length.
    Readable { pos: usize, mark: Option<usize> },
}

/// A fixed-capacity buffer holding one chunk of a larger byte sequence.
///
/// A `ChunkBuffer` moves through a write-then-read life cycle: it is issued
/// by a [`BufferPool`](crate::BufferPool) in the fillable phase, accumulates
/// bytes from a reader via [`fill`](Self::fill) (or [`put_byte`](Self::put_byte) /
/// [`put_slice`](Self::put_slice)), is flipped with
/// [`make_readable`](Self::make_readable), and is then drained with
/// [`get_byte`](Self::get_byte) / [`get_bytes`](Self::get_bytes), optionally
/// replaying already-read bytes via [`mark`](Self::mark) /
/// [`reset`](Self::reset). [`release`](Self::release) consumes the handle and
/// hands the storage back to the issuing pool.
///
/// Buffers carry an immutable sequence index; ordering and equality compare
/// the index alone, so a set of buffers processed out of arrival order can be
/// sorted back into sequence with a plain `sort`.
///
/// A buffer is owned by exactly one holder at any instant; every mutating
/// operation takes `&mut self`, so concurrent use of a single instance does
/// not compile. The pool, by contrast, is safe to share across threads.
///
/// # Example
///
/// ```
/// use chunkpool::{BufferPool, PoolConfig};
///
/// # fn main() -> Result<(), chunkpool::BufferError> {
/// let pool = BufferPool::new(PoolConfig::new(16)?);
///
/// let mut buffer = pool.create(0)?;
/// buffer.fill(&mut &b"ABCDEFGHIJ"[..])?;
/// buffer.make_readable()?;
///
/// assert_eq!(buffer.get_byte()?, b'A');
/// assert_eq!(buffer.remaining(), 9);
///
/// buffer.release();
/// assert_eq!(pool.available(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ChunkBuffer {
    storage: BytesMut,
    capacity: usize,
    index: u64,
    cursor: Cursor,
    owner: Option<Weak<PoolShared>>,
}

impl ChunkBuffer {
    /// Builds a pool-issued buffer in the fillable-empty state.
    ///
    /// `storage` arrives cleared; its capacity may exceed `capacity`, in
    /// which case the extra space is never used.
    pub(crate) fn pooled(
        owner: Weak<PoolShared>,
        storage: BytesMut,
        capacity: usize,
        index: u64,
    ) -> Self {
        Self {
            storage,
            capacity,
            index,
            cursor: Cursor::Fillable,
            owner: Some(owner),
        }
    }

    /// Wraps already-in-memory bytes into a buffer with no pool ownership.
    ///
    /// The buffer starts directly in the readable phase over a private copy
    /// of `data`, so it can be consumed through the same interface as
    /// pool-issued buffers (test fixtures, small inline payloads).
    /// [`release`](Self::release) on a wrapped buffer is a no-op: a pool
    /// never reclaims memory it did not allocate. Wrapped buffers carry
    /// index 0.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkpool::ChunkBuffer;
    ///
    /// let mut buffer = ChunkBuffer::wrap(b"abc");
    /// assert!(buffer.has_remaining());
    /// assert_eq!(buffer.get_byte().unwrap(), b'a');
    /// ```
    pub fn wrap(data: impl AsRef<[u8]>) -> Self {
        let storage = BytesMut::from(data.as_ref());
        let capacity = storage.len();
        Self {
            storage,
            capacity,
            index: 0,
            cursor: Cursor::Readable { pos: 0, mark: None },
            owner: None,
        }
    }

    /// Returns this buffer's position within its issuing sequence.
    ///
    /// The index is only meaningful relative to other buffers from the same
    /// sequence; it never addresses bytes within the buffer.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes currently stored.
    ///
    /// In the fillable phase this is the write position; in the readable
    /// phase it is the readable limit.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no bytes have been stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns true while the buffer accepts writes.
    pub fn is_fillable(&self) -> bool {
        matches!(self.cursor, Cursor::Fillable)
    }

    /// Returns true once the buffer has been made readable.
    pub fn is_readable(&self) -> bool {
        matches!(self.cursor, Cursor::Readable { .. })
    }

    /// Returns true if the buffer was issued by a pool (as opposed to
    /// wrapping caller-supplied bytes).
    pub fn is_pooled(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns the number of unread bytes in the current readable window.
    ///
    /// Zero while the buffer is still fillable.
    pub fn remaining(&self) -> usize {
        match self.cursor {
            Cursor::Readable { pos, .. } => self.storage.len() - pos,
            Cursor::Fillable => 0,
        }
    }

    /// Returns true iff at least one more byte can be read.
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Returns the space left for writes in the fillable phase.
    ///
    /// Zero once the buffer has been made readable.
    pub fn remaining_capacity(&self) -> usize {
        match self.cursor {
            Cursor::Fillable => self.capacity - self.storage.len(),
            Cursor::Readable { .. } => 0,
        }
    }

    /// Reads from `reader` into the remaining capacity until the reader
    /// reports end-of-data or the buffer is full, whichever comes first.
    ///
    /// Returns the number of bytes added by this call (zero when the reader
    /// was already exhausted or the buffer already full). Read failures
    /// propagate verbatim, leaving the buffer partially filled; drop it or
    /// call [`clear`](Self::clear) before reuse. Filling never flips the
    /// buffer to readable.
    ///
    /// This is the only operation that performs I/O; it blocks exactly as
    /// long as the underlying reader blocks.
    pub fn fill<R: Read>(&mut self, reader: &mut R) -> Result<usize, BufferError> {
        if !self.is_fillable() {
            return Err(BufferError::NotFillable);
        }

        let mut scratch = [0u8; FILL_BLOCK_SIZE];
        let mut total = 0;

        loop {
            let room = self.capacity - self.storage.len();
            if room == 0 {
                break;
            }
            let want = room.min(FILL_BLOCK_SIZE);
            let n = reader.read(&mut scratch[..want])?;
            if n == 0 {
                break;
            }
            self.storage.extend_from_slice(&scratch[..n]);
            total += n;
        }

        Ok(total)
    }

    /// Appends a single byte.
    ///
    /// Fails with [`BufferError::BufferFull`] once the capacity is reached
    /// and with [`BufferError::NotFillable`] after the flip.
    pub fn put_byte(&mut self, byte: u8) -> Result<(), BufferError> {
        if !self.is_fillable() {
            return Err(BufferError::NotFillable);
        }
        if self.storage.len() >= self.capacity {
            return Err(BufferError::BufferFull {
                capacity: self.capacity,
            });
        }
        self.storage.put_u8(byte);
        Ok(())
    }

    /// Appends a whole slice, or fails without writing anything.
    pub fn put_slice(&mut self, src: &[u8]) -> Result<(), BufferError> {
        if !self.is_fillable() {
            return Err(BufferError::NotFillable);
        }
        if src.len() > self.capacity - self.storage.len() {
            return Err(BufferError::BufferFull {
                capacity: self.capacity,
            });
        }
        self.storage.extend_from_slice(src);
        Ok(())
    }

    /// Flips the buffer from fillable to readable.
    ///
    /// One-way per use-cycle: the readable limit is fixed to the bytes
    /// written so far and the read cursor moves to the start. Filling (or
    /// flipping again) after this call is rejected until the buffer goes
    /// through [`clear`](Self::clear) or is released and reissued.
    pub fn make_readable(&mut self) -> Result<(), BufferError> {
        match self.cursor {
            Cursor::Fillable => {
                self.cursor = Cursor::Readable { pos: 0, mark: None };
                Ok(())
            }
            Cursor::Readable { .. } => Err(BufferError::NotFillable),
        }
    }

    /// Returns the next unread byte.
    ///
    /// Fails with [`BufferError::Underflow`] when nothing remains; gate
    /// calls with [`has_remaining`](Self::has_remaining). Underflow is a
    /// contract violation, not a recoverable I/O condition.
    pub fn get_byte(&mut self) -> Result<u8, BufferError> {
        let Cursor::Readable { pos, .. } = &mut self.cursor else {
            return Err(BufferError::NotReadable);
        };
        if *pos >= self.storage.len() {
            return Err(BufferError::Underflow);
        }
        let byte = self.storage[*pos];
        *pos += 1;
        Ok(byte)
    }

    /// Copies up to `dest.len()` unread bytes into `dest`, returning the
    /// count actually copied (possibly zero).
    ///
    /// A destination offset is expressed by slicing: `get_bytes(&mut
    /// dest[off..off + max])`. Short reads signal "buffer drained" and are
    /// never an error.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkpool::ChunkBuffer;
    ///
    /// let mut buffer = ChunkBuffer::wrap(b"ABCDEFGHIJ");
    /// let mut dest = [0u8; 5];
    /// assert_eq!(buffer.get_bytes(&mut dest).unwrap(), 5);
    /// assert_eq!(&dest, b"ABCDE");
    /// assert_eq!(buffer.get_bytes(&mut dest).unwrap(), 5);
    /// assert_eq!(&dest, b"FGHIJ");
    /// assert_eq!(buffer.get_bytes(&mut dest).unwrap(), 0);
    /// ```
    pub fn get_bytes(&mut self, dest: &mut [u8]) -> Result<usize, BufferError> {
        let Cursor::Readable { pos, .. } = &mut self.cursor else {
            return Err(BufferError::NotReadable);
        };
        let remaining = self.storage.len() - *pos;
        let n = dest.len().min(remaining);
        dest[..n].copy_from_slice(&self.storage[*pos..*pos + n]);
        *pos += n;
        Ok(n)
    }

    /// Saves the current read position for a later [`reset`](Self::reset).
    ///
    /// Valid only in the readable phase. The mark is discarded by
    /// [`clear`](Self::clear) and by release/reissue.
    pub fn mark(&mut self) -> Result<(), BufferError> {
        match &mut self.cursor {
            Cursor::Readable { pos, mark } => {
                *mark = Some(*pos);
                Ok(())
            }
            Cursor::Fillable => Err(BufferError::NotReadable),
        }
    }

    /// Restores the read position to the last [`mark`](Self::mark),
    /// replaying already-read bytes (e.g., to retry a partially consumed
    /// operation without refetching).
    ///
    /// Fails with [`BufferError::MarkNotSet`] when no mark was set in the
    /// current read cycle; stale data is never returned silently.
    pub fn reset(&mut self) -> Result<(), BufferError> {
        match &mut self.cursor {
            Cursor::Readable { pos, mark } => match mark {
                Some(m) => {
                    *pos = *m;
                    Ok(())
                }
                None => Err(BufferError::MarkNotSet),
            },
            Cursor::Fillable => Err(BufferError::NotReadable),
        }
    }

    /// Resets the buffer to the fillable-empty state, discarding any unread
    /// data and the mark.
    ///
    /// Prepares a buffer for reuse without going through release/reissue.
    /// On a wrapped buffer this discards the wrapped payload; the buffer
    /// then behaves like any other unpooled buffer of the same capacity.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.cursor = Cursor::Fillable;
    }

    /// Consumes the buffer, handing its storage back to the issuing pool
    /// for reuse.
    ///
    /// Taking `self` by value makes double release and use-after-release
    /// compile errors rather than runtime races. For a wrapped buffer this
    /// is a no-op. Dropping a pool-issued buffer without calling `release`
    /// reclaims the storage the same way, so early exits cannot leak pool
    /// memory.
    pub fn release(self) {}
}

impl Drop for ChunkBuffer {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.take() {
            // The pool may be gone; then the storage is simply freed.
            if let Some(pool) = owner.upgrade() {
                pool.reclaim(mem::take(&mut self.storage));
            }
        }
    }
}

impl PartialEq for ChunkBuffer {
    /// Equality follows ordering: buffers compare by sequence index alone.
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ChunkBuffer {}

impl PartialOrd for ChunkBuffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkBuffer {
    /// Buffers sort by sequence index ascending, restoring chunk order when
    /// processed out of arrival order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Debug for ChunkBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBuffer")
            .field("index", &self.index)
            .field("capacity", &self.capacity)
            .field("len", &self.storage.len())
            .field("readable", &self.is_readable())
            .field("pooled", &self.is_pooled())
            .finish()
    }
}

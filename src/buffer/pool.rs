//! Thread-safe buffer pool for storage reuse across chunk transfers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::BytesMut;
use tracing::{debug, trace};

use super::chunk::ChunkBuffer;
use crate::config::PoolConfig;
use crate::error::BufferError;

/// Issues fixed-capacity [`ChunkBuffer`]s and reclaims their storage when
/// they are released, amortizing allocation cost across transfers.
///
/// The pool is the shared resource of the crate: cloning a `BufferPool` is
/// cheap (a shared handle), and [`create`](Self::create) /
/// [`give_back`](Self::give_back) are safe to call concurrently from many
/// worker threads. Each issued buffer remains single-owner; it finds its way
/// back to the pool when released or dropped.
///
/// Reclaimed storage is kept on a bounded free list
/// ([`PoolConfig::max_pooled`](crate::PoolConfig::max_pooled) entries);
/// beyond that bound, storage is dropped instead of cached.
///
/// # Example
///
/// ```
/// use chunkpool::{BufferPool, PoolConfig};
///
/// # fn main() -> Result<(), chunkpool::BufferError> {
/// let pool = BufferPool::new(PoolConfig::new(8 * 1024)?);
///
/// let buffer = pool.create(0)?;
/// buffer.release();
///
/// // The next create reuses the reclaimed storage
/// let _buffer = pool.create(1)?;
/// assert_eq!(pool.stats().reuses, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BufferPool {
    shared: Arc<PoolShared>,
}

/// State shared between pool handles and the buffers they issued.
///
/// Buffers hold a `Weak` reference to this, so the pool's lifetime is
/// controlled by its handles alone; a buffer that outlives every handle
/// simply drops its storage.
pub(crate) struct PoolShared {
    config: PoolConfig,
    free: Mutex<Vec<BytesMut>>,
    allocations: AtomicUsize,
    reuses: AtomicUsize,
    reclaims: AtomicUsize,
}

/// Counters describing a pool's allocation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Buffers created with freshly allocated storage.
    pub allocations: usize,
    /// Buffers created from reclaimed storage.
    pub reuses: usize,
    /// Give-backs whose storage was kept on the free list.
    pub reclaims: usize,
}

impl PoolShared {
    fn lock_free(&self) -> MutexGuard<'_, Vec<BytesMut>> {
        // The free list holds whole slabs, so a panicking holder cannot
        // leave it torn; recover the guard instead of propagating.
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reclaim hook: accepts storage from a released buffer.
    ///
    /// The slab is cleared before it becomes visible for reuse. Invoked at
    /// most once per issued buffer (the buffer's drop detaches its owner).
    pub(crate) fn reclaim(&self, mut storage: BytesMut) {
        storage.clear();

        let mut free = self.lock_free();
        if free.len() < self.config.max_pooled() {
            free.push(storage);
            drop(free);
            self.reclaims.fetch_add(1, Ordering::Relaxed);
            trace!("buffer storage reclaimed");
        } else {
            drop(free);
            debug!(
                max_pooled = self.config.max_pooled(),
                "free list full, dropping storage"
            );
        }
    }
}

impl BufferPool {
    /// Creates a pool with the given configuration.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                config,
                free: Mutex::new(Vec::new()),
                allocations: AtomicUsize::new(0),
                reuses: AtomicUsize::new(0),
                reclaims: AtomicUsize::new(0),
            }),
        }
    }

    /// Issues a fillable-empty buffer of the configured capacity, tagged
    /// with `index`.
    pub fn create(&self, index: u64) -> Result<ChunkBuffer, BufferError> {
        self.create_with_capacity(self.shared.config.buffer_capacity(), index)
    }

    /// Issues a fillable-empty buffer of an explicit capacity, tagged with
    /// `index`.
    ///
    /// Reuses reclaimed storage when a sufficient slab is available, else
    /// allocates fresh. Fails with [`BufferError::InvalidCapacity`] for a
    /// zero capacity or one above the configured per-buffer ceiling.
    pub fn create_with_capacity(
        &self,
        capacity: usize,
        index: u64,
    ) -> Result<ChunkBuffer, BufferError> {
        let max = self.shared.config.max_capacity();
        if capacity == 0 || capacity > max {
            return Err(BufferError::InvalidCapacity {
                requested: capacity,
                max,
            });
        }

        let recycled = {
            let mut free = self.shared.lock_free();
            free.iter()
                .position(|slab| slab.capacity() >= capacity)
                .map(|i| free.swap_remove(i))
        };

        let storage = match recycled {
            Some(slab) => {
                self.shared.reuses.fetch_add(1, Ordering::Relaxed);
                trace!(index, capacity, "issuing buffer from reclaimed storage");
                slab
            }
            None => {
                self.shared.allocations.fetch_add(1, Ordering::Relaxed);
                trace!(index, capacity, "issuing freshly allocated buffer");
                BytesMut::with_capacity(capacity)
            }
        };

        Ok(ChunkBuffer::pooled(
            Arc::downgrade(&self.shared),
            storage,
            capacity,
            index,
        ))
    }

    /// Accepts a previously issued buffer, making its storage available for
    /// a future [`create`](Self::create).
    ///
    /// Taking the buffer by value ends the caller's ownership; continued use
    /// after a give-back does not compile. The storage always returns to the
    /// buffer's *issuing* pool (a buffer from another pool finds its own way
    /// home, and a wrapped buffer is simply dropped).
    ///
    /// Equivalent to [`ChunkBuffer::release`].
    pub fn give_back(&self, buffer: ChunkBuffer) {
        drop(buffer);
    }

    /// Returns the number of idle storage slabs ready for reuse.
    pub fn available(&self) -> usize {
        self.shared.lock_free().len()
    }

    /// Returns a snapshot of the pool's allocation counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocations: self.shared.allocations.load(Ordering::Relaxed),
            reuses: self.shared.reuses.load(Ordering::Relaxed),
            reclaims: self.shared.reclaims.load(Ordering::Relaxed),
        }
    }

    /// Returns the pool's configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.shared.config)
            .field("available", &self.available())
            .finish()
    }
}

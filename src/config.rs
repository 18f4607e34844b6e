//! Configuration for the buffer pool.
//!
//! - [`PoolConfig`] - Buffer capacity and free-list bounds

use crate::error::BufferError;

/// Default capacity of a pooled buffer (64 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default maximum number of idle buffers the pool keeps for reuse.
pub const DEFAULT_MAX_POOLED: usize = 8;

/// Default ceiling for a single buffer's capacity (64 MiB).
pub const DEFAULT_MAX_CAPACITY: usize = 64 * 1024 * 1024;

/// Configuration for a [`BufferPool`](crate::BufferPool).
///
/// `buffer_capacity` is the capacity of buffers issued by
/// [`create`](crate::BufferPool::create); `max_pooled` bounds the free list
/// (storage given back beyond that bound is dropped instead of kept);
/// `max_capacity` caps the size of any single buffer the pool will issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    buffer_capacity: usize,
    max_pooled: usize,
    max_capacity: usize,
}

impl PoolConfig {
    /// Creates a new configuration with the given default buffer capacity.
    ///
    /// Returns an error if the capacity is zero or exceeds the default
    /// per-buffer ceiling.
    pub fn new(buffer_capacity: usize) -> Result<Self, BufferError> {
        let config = Self {
            buffer_capacity,
            max_pooled: DEFAULT_MAX_POOLED,
            max_capacity: DEFAULT_MAX_CAPACITY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the capacity of buffers issued without an explicit capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets the maximum number of idle buffers kept for reuse.
    ///
    /// Zero disables pooling entirely; every give-back drops its storage.
    pub fn with_max_pooled(mut self, max_pooled: usize) -> Self {
        self.max_pooled = max_pooled;
        self
    }

    /// Sets the per-buffer capacity ceiling.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Returns the capacity of buffers issued without an explicit capacity.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Returns the maximum number of idle buffers kept for reuse.
    pub fn max_pooled(&self) -> usize {
        self.max_pooled
    }

    /// Returns the per-buffer capacity ceiling.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.buffer_capacity == 0 {
            return Err(BufferError::InvalidConfig {
                message: "buffer capacity must be non-zero",
            });
        }

        if self.max_capacity == 0 {
            return Err(BufferError::InvalidConfig {
                message: "max capacity must be non-zero",
            });
        }

        if self.buffer_capacity > self.max_capacity {
            return Err(BufferError::InvalidConfig {
                message: "buffer capacity cannot exceed max capacity",
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pooled: DEFAULT_MAX_POOLED,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

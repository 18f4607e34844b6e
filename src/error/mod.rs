//! Error types for chunkpool.

use std::fmt;

/// Errors that can occur while filling, draining, or issuing buffers.
///
/// I/O failures (`Io`) are recoverable conditions propagated from the
/// underlying reader. The remaining variants signal contract violations:
/// reading past the limit, writing past capacity, or calling an operation
/// in the wrong phase of the buffer's life cycle.
#[derive(Debug)]
pub enum BufferError {
    /// An I/O error occurred while reading from the source stream.
    Io(std::io::Error),

    /// A read was attempted with no bytes remaining.
    ///
    /// Callers are expected to gate reads with
    /// [`has_remaining`](crate::ChunkBuffer::has_remaining).
    Underflow,

    /// A write was attempted on a buffer that has reached its capacity.
    BufferFull {
        /// The fixed capacity of the buffer.
        capacity: usize,
    },

    /// A fill-phase operation was called on a buffer that is not fillable.
    NotFillable,

    /// A read-phase operation was called before the buffer was made readable.
    NotReadable,

    /// `reset` was called without a prior `mark` in the current read cycle.
    MarkNotSet,

    /// A buffer was requested with a capacity the pool cannot satisfy.
    InvalidCapacity {
        /// The capacity that was requested.
        requested: usize,
        /// The maximum capacity the pool allows.
        max: usize,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Io(e) => write!(f, "io error: {}", e),
            BufferError::Underflow => write!(f, "read underflow: no bytes remaining"),
            BufferError::BufferFull { capacity } => {
                write!(f, "buffer full: capacity of {} bytes reached", capacity)
            }
            BufferError::NotFillable => write!(f, "buffer is not in the fillable phase"),
            BufferError::NotReadable => write!(f, "buffer has not been made readable"),
            BufferError::MarkNotSet => write!(f, "reset called without a prior mark"),
            BufferError::InvalidCapacity { requested, max } => {
                write!(f, "invalid capacity: {} bytes (max {})", requested, max)
            }
            BufferError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BufferError {
    fn from(e: std::io::Error) -> Self {
        BufferError::Io(e)
    }
}

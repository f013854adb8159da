//! Error types for table construction.

use thiserror::Error;

/// Result type for fallible `MultiMap` operations.
pub type Result<T> = std::result::Result<T, MultiMapError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MultiMapError {
    /// Slot positions are computed with a bitmask, so capacity must be `2^n`.
    #[error("capacity must be a nonzero power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),
}

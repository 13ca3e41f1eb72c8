//! Standalone error types for ember-memory
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

/// Memory management errors
///
/// Every detectable failure is reported synchronously through the return
/// channel of the operation that hit it; none leaves the pool in a
/// partially-mutated state. Caller contract violations (double free, foreign
/// pointers) are *not* represented here; they are undefined behavior and
/// documented on [`FreeListAllocator::deallocate`].
///
/// [`FreeListAllocator::deallocate`]: crate::allocator::FreeListAllocator::deallocate
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Pool capacity configured below one block header at construction.
    ///
    /// The allocator is constructed but inert; every `allocate` call fails
    /// with this error.
    #[error("pool capacity {capacity} cannot back a free-list pool (minimum {required} bytes)")]
    InvalidConfig { capacity: usize, required: usize },

    /// No free block can satisfy the request. Pool state is unchanged; the
    /// caller may free other blocks and retry.
    #[error("pool exhausted: no free block can hold {requested} bytes (capacity {capacity})")]
    PoolExhausted { requested: usize, capacity: usize },

    /// Zero-size allocation request, a degenerate no-op failure.
    #[error("zero-size allocation request")]
    ZeroSizeRequest,
}

impl MemoryError {
    /// Check if error is retryable
    ///
    /// Exhaustion is the only condition the caller can recover from (by
    /// freeing blocks and retrying); the allocator itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }

    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "MEM:CONFIG:INVALID",
            Self::PoolExhausted { .. } => "MEM:POOL:EXHAUSTED",
            Self::ZeroSizeRequest => "MEM:ALLOC:ZERO",
        }
    }

    /// Create an invalid pool configuration error
    pub fn invalid_config(capacity: usize, required: usize) -> Self {
        #[cfg(feature = "logging")]
        error!(
            "Invalid pool configuration: {} bytes (minimum {})",
            capacity, required
        );

        Self::InvalidConfig { capacity, required }
    }

    /// Create a pool exhausted error
    pub fn pool_exhausted(requested: usize, capacity: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(
            "Pool exhausted: {} bytes requested from a {} byte pool",
            requested, capacity
        );

        Self::PoolExhausted {
            requested,
            capacity,
        }
    }
}

/// Result type for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MemoryError::invalid_config(8, 32).code(),
            "MEM:CONFIG:INVALID"
        );
        assert_eq!(
            MemoryError::pool_exhausted(512, 256).code(),
            "MEM:POOL:EXHAUSTED"
        );
        assert_eq!(MemoryError::ZeroSizeRequest.code(), "MEM:ALLOC:ZERO");
    }

    #[test]
    fn test_retryability() {
        assert!(MemoryError::pool_exhausted(512, 256).is_retryable());
        assert!(!MemoryError::invalid_config(8, 32).is_retryable());
        assert!(!MemoryError::ZeroSizeRequest.is_retryable());
    }

    #[test]
    fn test_display_carries_sizes() {
        let msg = MemoryError::pool_exhausted(512, 256).to_string();
        assert!(msg.contains("512"));
        assert!(msg.contains("256"));
    }
}

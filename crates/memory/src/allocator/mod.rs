//! Custom allocators for memory management
//!
//! This module hosts the allocator implementations. Currently there is one:
//! the intrusive free-list pool allocator.

pub mod freelist;

// Re-exports for convenience
pub use freelist::{BlockInfo, FreeBlockInfo, FreeListAllocator, FreeListConfig, FreeListStats};

pub use crate::error::{MemoryError, MemoryResult};

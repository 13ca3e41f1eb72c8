//! # ember-memory
//!
//! Fixed-pool memory management for the Ember runtime.
//!
//! This crate provides a manual `allocate`/`deallocate` allocator over a
//! single contiguous byte region acquired once at construction. Block
//! metadata is *intrusive*: every block, allocated or free, is prefixed by
//! a header stored inline inside the managed memory, and free blocks thread
//! a doubly linked free list through their own headers. No auxiliary
//! bookkeeping structures are allocated.
//!
//! ```text
//!   Pool layout (one possible moment in time):
//!
//!   ┌────────┬──────────────┬────────┬──────┬────────┬──────────────────┐
//!   │ header │  payload     │ header │ ...  │ header │  payload         │
//!   │ (used) │              │ (free) │      │ (used) │                  │
//!   └────────┴──────────────┴────────┴──────┴────────┴──────────────────┘
//!              ▲                ▲
//!              │                └── free blocks link next/prev through
//!              │                    their headers (unordered by address)
//!              └── pointers returned to callers start after the header
//! ```
//!
//! Allocation is first-fit over the free list with block splitting;
//! deallocation eagerly coalesces with both physical neighbors, so no two
//! adjacent blocks are ever both free.
//!
//! ## Quick Start
//!
//! ```rust
//! use ember_memory::prelude::*;
//!
//! let mut pool = FreeListAllocator::new(1024);
//!
//! let ptr = pool.allocate(100)?;
//! // ... use the 100 bytes behind `ptr` ...
//! unsafe { pool.deallocate(ptr.as_ptr()) };
//!
//! assert_eq!(pool.free_list().len(), 1); // fully coalesced again
//! # Ok::<(), ember_memory::MemoryError>(())
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured logging of lifecycle and error paths
//!   via `tracing`
//!
//! ## Concurrency
//!
//! The allocator is single-owner and single-threaded by construction: it
//! hands out raw pointers into memory it owns and is therefore neither
//! `Send` nor `Sync`. Concurrent use requires an external lock around the
//! whole allocator; none is provided here.

// Workspace policy warns on `unsafe_code`; an intrusive allocator is the
// crate-level opt-out case.
#![allow(unsafe_code)]

// Error types
pub mod error;

// Core modules
pub mod allocator;
pub mod core;
pub mod utils;

// Re-export core types for convenience
pub use crate::error::{MemoryError, MemoryResult};

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::allocator::{
        BlockInfo, FreeBlockInfo, FreeListAllocator, FreeListConfig, FreeListStats,
    };
    pub use crate::core::traits::{MemoryUsage, Resettable};
    pub use crate::error::{MemoryError, MemoryResult};
}

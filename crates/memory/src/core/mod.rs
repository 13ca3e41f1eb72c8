//! Core types and traits shared across allocator implementations.

pub mod traits;

pub use traits::{MemoryUsage, Resettable};

//! Cross-allocator traits.
//!
//! These are the seams an allocator exposes beyond its own allocate/free
//! surface: usage accounting and whole-pool reset.

/// Memory usage accounting.
pub trait MemoryUsage {
    /// Bytes currently handed out, including per-block metadata overhead.
    fn used_memory(&self) -> usize;

    /// Bytes still available for allocation, if the allocator can tell.
    fn available_memory(&self) -> Option<usize>;

    /// Total bytes managed, if the allocator can tell.
    fn total_memory(&self) -> Option<usize>;
}

/// Allocators that can return to their freshly-constructed state.
pub trait Resettable {
    /// Resets the allocator, reclaiming all outstanding allocations at once.
    ///
    /// # Safety
    ///
    /// Caller must ensure that no pointers returned by the allocator are
    /// used after the reset; every outstanding allocation is invalidated.
    unsafe fn reset(&mut self);

    /// Whether reset is supported in the allocator's current state.
    fn can_reset(&self) -> bool {
        true
    }
}

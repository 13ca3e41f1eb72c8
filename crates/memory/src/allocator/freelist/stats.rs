//! Free-list allocator statistics

/// Statistics for the free-list allocator
///
/// A point-in-time copy; counters are only maintained while
/// [`FreeListConfig::track_stats`](super::FreeListConfig) is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeListStats {
    /// Total successful allocations
    pub total_allocs: u64,
    /// Total deallocations
    pub total_deallocs: u64,
    /// Allocation requests that failed with exhaustion
    pub failed_allocs: u64,
    /// Peak memory usage in bytes (including headers)
    pub peak_usage: usize,
    /// Current memory usage in bytes (including headers)
    pub current_usage: usize,
    /// Pool capacity in bytes
    pub capacity: usize,
    /// Number of blocks currently on the free list
    pub free_blocks: usize,
}

//! Main free-list allocator implementation
//!
//! # Safety
//!
//! This module implements a single-owner pool allocator with an intrusive
//! free list:
//! - One contiguous pool acquired at construction, released in `Drop`
//! - Block headers written inline into the managed bytes
//! - Free blocks doubly linked through their own headers
//! - First-fit search, block splitting, eager bidirectional coalescing
//!
//! ## Invariants
//!
//! - Blocks tile the pool exactly: no gaps, no overlaps, sizes sum to the
//!   capacity
//! - Every free block is on the free list exactly once; allocated blocks are
//!   on no list
//! - No two physically adjacent blocks are both free
//! - Every block is at least one header in size and starts on a
//!   `HEADER_ALIGN` boundary

use core::fmt;
use core::ptr::{self, NonNull};
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};

use super::block::{BlockHeader, BlockInfo, FreeBlockInfo, HEADER_ALIGN, HEADER_SIZE, is_left_neighbor};
use super::{FreeListConfig, FreeListStats};
use crate::core::traits::{MemoryUsage, Resettable};
use crate::error::{MemoryError, MemoryResult};
use crate::utils::{align_up, is_aligned};

#[cfg(feature = "logging")]
use tracing::{debug, error, trace};

/// Fixed-pool allocator with an intrusive free list
///
/// Manages one contiguous byte region for its entire lifetime. The region is
/// partitioned into variable-size blocks, each prefixed by an inline header;
/// free blocks additionally thread a doubly linked list through their
/// headers, unordered with respect to address.
///
/// # Memory Layout
/// ```text
/// [hdr|payload][hdr|payload][hdr|payload][hdr|payload]
///   used         free ◄──┐    used         free ◄─head
///                        └────────────────── next ┘
/// ```
///
/// Holding raw pointers into its own pool, the allocator is neither `Send`
/// nor `Sync`; concurrent use requires an external lock around the whole
/// value.
pub struct FreeListAllocator {
    /// Pool base address; null when the allocator is degraded (constructed
    /// with a capacity too small to hold a single header)
    pool: *mut u8,

    /// Configured pool capacity in bytes
    capacity: usize,

    /// Head of the free list; null when the pool is fully allocated
    free_head: *mut BlockHeader,

    /// Configuration
    config: FreeListConfig,

    /// Bytes currently handed out, headers included
    used_bytes: usize,

    /// Statistics (only maintained when `config.track_stats` is on)
    total_allocs: u64,
    total_deallocs: u64,
    failed_allocs: u64,
    peak_usage: usize,
}

impl FreeListAllocator {
    /// Creates an allocator managing a fresh pool of `capacity` bytes.
    ///
    /// If `capacity` cannot hold even one block header the allocator is
    /// constructed *degraded*: it owns no pool, its free list is empty, and
    /// every [`allocate`](Self::allocate) call fails with
    /// [`MemoryError::InvalidConfig`]. The condition is also reported
    /// through the logging layer at construction time.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, FreeListConfig::default())
    }

    /// Creates an allocator with custom configuration.
    ///
    /// See [`new`](Self::new) for the degraded-construction behavior.
    pub fn with_config(capacity: usize, config: FreeListConfig) -> Self {
        // Degraded until a pool is actually attached below; Self implements
        // Drop, so fields are assigned in place rather than moved out of a
        // template value.
        let mut allocator = Self {
            pool: ptr::null_mut(),
            capacity,
            free_head: ptr::null_mut(),
            config,
            used_bytes: 0,
            total_allocs: 0,
            total_deallocs: 0,
            failed_allocs: 0,
            peak_usage: 0,
        };

        if capacity < HEADER_SIZE {
            #[cfg(feature = "logging")]
            error!(
                "Pool capacity {} cannot hold a block header ({} bytes); allocator is inert",
                capacity, HEADER_SIZE
            );
            return allocator;
        }

        let Ok(layout) = Layout::from_size_align(capacity, HEADER_ALIGN) else {
            #[cfg(feature = "logging")]
            error!(
                "Pool capacity {} exceeds the addressable range; allocator is inert",
                capacity
            );
            return allocator;
        };

        // SAFETY: layout has non-zero size (capacity >= HEADER_SIZE). The
        // allocation is released exactly once, in Drop, with the same layout.
        let pool = unsafe { alloc(layout) };
        if pool.is_null() {
            handle_alloc_error(layout);
        }

        let head = pool.cast::<BlockHeader>();
        // SAFETY: Writing the initial header at the pool start.
        // - pool is valid for `capacity` bytes and capacity >= HEADER_SIZE
        // - pool is aligned to HEADER_ALIGN (requested in the layout)
        // - The single free block spans the whole pool with no neighbors
        unsafe {
            head.write(BlockHeader {
                size: capacity,
                is_free: true,
                next: ptr::null_mut(),
                prev: ptr::null_mut(),
            });
        }

        #[cfg(feature = "logging")]
        debug!(
            "Free-list pool initialized: {} bytes, {} byte headers",
            capacity, HEADER_SIZE
        );

        allocator.pool = pool;
        allocator.free_head = head;
        allocator
    }

    /// Per-block metadata overhead in bytes.
    ///
    /// An allocation of `n` bytes consumes `n + header_overhead()` pool
    /// bytes, rounded up so the next header stays naturally aligned.
    #[must_use]
    pub const fn header_overhead() -> usize {
        HEADER_SIZE
    }

    /// Configured pool capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether construction produced a working pool.
    pub fn is_operational(&self) -> bool {
        !self.pool.is_null()
    }

    /// Bytes not currently handed out, headers included.
    pub fn free_bytes(&self) -> usize {
        if self.pool.is_null() {
            0
        } else {
            self.capacity - self.used_bytes
        }
    }

    /// Number of blocks currently on the free list.
    pub fn free_block_count(&self) -> usize {
        let mut count = 0;
        let mut current = self.free_head;
        while !current.is_null() {
            count += 1;
            // SAFETY: free-list nodes are valid headers inside the pool.
            current = unsafe { (*current).next };
        }
        count
    }

    /// Checks if a pointer lies inside this allocator's pool.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let addr = ptr as usize;
        let start = self.pool as usize;
        !self.pool.is_null() && addr >= start && addr < start + self.capacity
    }

    /// Allocates at least `size` usable bytes from the pool.
    ///
    /// Searches the free list first-fit in its current order: "first
    /// encountered", not "lowest address", since the list is unordered with
    /// respect to address. A block larger than needed is split when the
    /// leftover can host a header of its own; otherwise the whole block,
    /// slack included, is handed out so no unusably small fragment is ever
    /// created.
    ///
    /// The returned pointer addresses the first byte after the block header
    /// and stays valid until passed to [`deallocate`](Self::deallocate) or
    /// the allocator is dropped.
    ///
    /// # Errors
    ///
    /// - [`MemoryError::ZeroSizeRequest`] for `size == 0` (no side effects)
    /// - [`MemoryError::InvalidConfig`] on a degraded allocator
    /// - [`MemoryError::PoolExhausted`] when no free block is large enough;
    ///   the pool is left untouched
    pub fn allocate(&mut self, size: usize) -> MemoryResult<NonNull<u8>> {
        if size == 0 {
            #[cfg(feature = "logging")]
            trace!("zero-size allocation request refused");
            return Err(MemoryError::ZeroSizeRequest);
        }

        if self.pool.is_null() {
            return Err(MemoryError::InvalidConfig {
                capacity: self.capacity,
                required: HEADER_SIZE,
            });
        }

        if size > self.capacity {
            // Cannot possibly fit; also keeps the size arithmetic below
            // comfortably inside usize.
            if self.config.track_stats {
                self.failed_allocs += 1;
            }
            return Err(MemoryError::pool_exhausted(size, self.capacity));
        }

        // Rounded up so the block that follows starts header-aligned.
        let total = align_up(size + HEADER_SIZE, HEADER_ALIGN);

        // First-fit: the search mutates nothing until a candidate commits.
        let mut current = self.free_head;
        while !current.is_null() {
            // SAFETY: `current` came from the free list, whose nodes are
            // valid headers inside the pool.
            let block_size = unsafe { (*current).size };
            if block_size >= total {
                // SAFETY: `current` is a free block large enough for
                // `total`; commit splits or unlinks it and marks it
                // allocated.
                let payload = unsafe { self.commit(current, total) };

                if self.config.track_stats {
                    self.total_allocs += 1;
                    self.peak_usage = self.peak_usage.max(self.used_bytes);
                }
                return Ok(payload);
            }
            // SAFETY: same as the size read above.
            current = unsafe { (*current).next };
        }

        if self.config.track_stats {
            self.failed_allocs += 1;
        }
        Err(MemoryError::pool_exhausted(size, self.capacity))
    }

    /// Returns a block to the pool, coalescing with both physical neighbors.
    ///
    /// A null `ptr` is a no-op. The physically following block is absorbed
    /// first when free (an O(1) address computation); then the free list is
    /// scanned for a block ending exactly where this one begins and merged
    /// into it if found. Only if no left neighbor exists is the block pushed
    /// onto the head of the list. After every call, no two physically
    /// adjacent blocks are both free.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a pointer previously returned by
    /// [`allocate`](Self::allocate) on this allocator that has not been
    /// deallocated since. Double frees and foreign pointers are not
    /// detected and corrupt the free list.
    pub unsafe fn deallocate(&mut self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }

        debug_assert!(self.contains(ptr));
        debug_assert!(is_aligned(ptr as usize, HEADER_ALIGN));

        // SAFETY: per the caller contract, `ptr` points just past a live
        // block header inside the pool.
        let block = unsafe { ptr.sub(HEADER_SIZE) }.cast::<BlockHeader>();
        // SAFETY: `block` is that header.
        let block_size = unsafe { (*block).size };
        debug_assert!(unsafe { !(*block).is_free }, "double free");

        if let Some(pattern) = self.config.dealloc_pattern {
            // SAFETY: the payload is exactly `block_size - HEADER_SIZE`
            // bytes starting at `ptr`, owned by this pool and no longer
            // exposed to the caller.
            unsafe { ptr::write_bytes(ptr, pattern, block_size - HEADER_SIZE) };
        }

        self.used_bytes -= block_size;
        if self.config.track_stats {
            self.total_deallocs += 1;
        }

        // Coalesce right first, so a left merge below absorbs the combined
        // extent in one step.
        // SAFETY: `block` is a valid header; the end-of-block address is
        // computed from its size, and dereferenced only after the bounds
        // check confirms another block starts there (partition invariant).
        unsafe {
            let end = block.cast::<u8>().add((*block).size);
            if (end as usize) < self.pool as usize + self.capacity {
                let next = end.cast::<BlockHeader>();
                if (*next).is_free {
                    (*block).size += (*next).size;
                    self.unlink(next);
                }
            }
        }

        // Left coalesce: scan the whole free list for a block ending at our
        // address. O(list length) on every call; the list is not address
        // ordered, so there is no cheaper lookup.
        // SAFETY: all list nodes are valid headers; on a merge the freed
        // block is absorbed into an existing list entry and needs no
        // insertion of its own.
        unsafe {
            let mut current = self.free_head;
            while !current.is_null() {
                if is_left_neighbor(current, block) {
                    (*current).size += (*block).size;
                    return;
                }
                current = (*current).next;
            }
            self.push_front(block);
        }
    }

    /// The free list as an ordered sequence of `(offset, size)` pairs.
    ///
    /// Order is list traversal order (most recently freed first, with split
    /// remainders keeping the position of the block they came from). An
    /// empty vector is the fully-exhausted pool, a distinct, valid state.
    /// Never mutates the allocator.
    pub fn free_list(&self) -> Vec<FreeBlockInfo> {
        let mut out = Vec::new();
        let mut current = self.free_head;
        while !current.is_null() {
            // SAFETY: free-list nodes are valid headers inside the pool.
            unsafe {
                out.push(FreeBlockInfo {
                    offset: current as usize - self.pool as usize,
                    size: (*current).size,
                });
                current = (*current).next;
            }
        }
        out
    }

    /// Every block in the pool, in physical address order.
    ///
    /// Walks the partition from the pool start by hopping `size` bytes at a
    /// time. Diagnostic only; this is what makes the tiling invariant
    /// directly observable in tests.
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let mut out = Vec::new();
        if self.pool.is_null() {
            return out;
        }
        let mut offset = 0;
        while offset < self.capacity {
            // SAFETY: by the partition invariant every hop lands on a live
            // block header, and the final hop lands exactly on `capacity`.
            unsafe {
                let header = self.pool.add(offset).cast::<BlockHeader>();
                out.push(BlockInfo {
                    offset,
                    size: (*header).size,
                    is_free: (*header).is_free,
                });
                offset += (*header).size;
            }
        }
        out
    }

    /// Point-in-time statistics, if tracking is enabled.
    pub fn stats(&self) -> Option<FreeListStats> {
        if !self.config.track_stats {
            return None;
        }

        Some(FreeListStats {
            total_allocs: self.total_allocs,
            total_deallocs: self.total_deallocs,
            failed_allocs: self.failed_allocs,
            peak_usage: self.peak_usage,
            current_usage: self.used_bytes,
            capacity: self.capacity,
            free_blocks: self.free_block_count(),
        })
    }

    /// Splits or takes `block` whole, unlinks it, marks it allocated, and
    /// returns the payload pointer.
    ///
    /// # Safety
    ///
    /// `block` must be on the free list with `size >= total`, and `total`
    /// must be a multiple of `HEADER_ALIGN`.
    unsafe fn commit(&mut self, block: *mut BlockHeader, total: usize) -> NonNull<u8> {
        // SAFETY: `block` is a valid free header per the caller contract.
        let block_size = unsafe { (*block).size };

        if block_size > total + HEADER_SIZE {
            // Split: low part becomes the allocation, high part a new free
            // block that takes over the original's place in the list.
            // SAFETY: the remainder header starts `total` bytes into the
            // block: in bounds (block_size > total) and aligned (both the
            // block start and `total` are HEADER_ALIGN multiples). Its links
            // are copied from `block`, so splice_in fixes the neighbors to
            // point at it.
            unsafe {
                let remainder = block.cast::<u8>().add(total).cast::<BlockHeader>();
                remainder.write(BlockHeader {
                    size: block_size - total,
                    is_free: true,
                    next: (*block).next,
                    prev: (*block).prev,
                });
                (*block).size = total;
                self.splice_in(remainder);
            }
        } else {
            // Perfect fit, or a leftover too small to host a header: hand
            // out the whole block, slack included.
            // SAFETY: `block` is on the list per the caller contract.
            unsafe { self.unlink(block) };
        }

        // SAFETY: `block` is no longer on the list; the payload starts
        // HEADER_SIZE bytes in and is non-null because the pool is.
        unsafe {
            (*block).is_free = false;
            self.used_bytes += (*block).size;

            let payload = block.cast::<u8>().add(HEADER_SIZE);
            if let Some(pattern) = self.config.alloc_pattern {
                ptr::write_bytes(payload, pattern, (*block).size - HEADER_SIZE);
            }
            NonNull::new_unchecked(payload)
        }
    }

    /// Removes `block` from the free list.
    ///
    /// # Safety
    ///
    /// `block` must currently be on the free list.
    unsafe fn unlink(&mut self, block: *mut BlockHeader) {
        // SAFETY: list nodes and their neighbors are valid headers.
        unsafe {
            let (prev, next) = ((*block).prev, (*block).next);
            if prev.is_null() {
                self.free_head = next;
            } else {
                (*prev).next = next;
            }
            if !next.is_null() {
                (*next).prev = prev;
            }
        }
    }

    /// Pushes `block` onto the head of the free list and marks it free.
    ///
    /// # Safety
    ///
    /// `block` must be a valid header not currently on the list.
    unsafe fn push_front(&mut self, block: *mut BlockHeader) {
        // SAFETY: `block` and the current head (if any) are valid headers.
        unsafe {
            (*block).is_free = true;
            (*block).next = self.free_head;
            (*block).prev = ptr::null_mut();
            if !self.free_head.is_null() {
                (*self.free_head).prev = block;
            }
            self.free_head = block;
        }
    }

    /// Hooks `block` into the list position described by its own
    /// `next`/`prev` links, fixing up the neighbors (and head) to point at
    /// it.
    ///
    /// # Safety
    ///
    /// `block.next`/`block.prev` must describe a live list position whose
    /// previous occupant is being replaced.
    unsafe fn splice_in(&mut self, block: *mut BlockHeader) {
        // SAFETY: the links were copied from a node that was on the list,
        // so prev/next (when non-null) are valid headers.
        unsafe {
            let (prev, next) = ((*block).prev, (*block).next);
            if prev.is_null() {
                self.free_head = block;
            } else {
                (*prev).next = block;
            }
            if !next.is_null() {
                (*next).prev = block;
            }
        }
    }
}

impl MemoryUsage for FreeListAllocator {
    fn used_memory(&self) -> usize {
        self.used_bytes
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.free_bytes())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(if self.pool.is_null() { 0 } else { self.capacity })
    }
}

impl Resettable for FreeListAllocator {
    /// # Safety
    ///
    /// Caller must ensure no pointer returned by
    /// [`allocate`](FreeListAllocator::allocate) is used after the reset;
    /// the whole pool collapses back into one free block.
    unsafe fn reset(&mut self) {
        if self.pool.is_null() {
            return;
        }

        let head = self.pool.cast::<BlockHeader>();
        // SAFETY: same write as construction; the pool is valid for
        // `capacity` bytes and header-aligned; outstanding allocations are
        // the caller's responsibility per the contract above.
        unsafe {
            head.write(BlockHeader {
                size: self.capacity,
                is_free: true,
                next: ptr::null_mut(),
                prev: ptr::null_mut(),
            });
        }
        self.free_head = head;
        self.used_bytes = 0;

        if self.config.track_stats {
            self.total_allocs = 0;
            self.total_deallocs = 0;
            self.failed_allocs = 0;
            self.peak_usage = 0;
        }
    }

    fn can_reset(&self) -> bool {
        !self.pool.is_null()
    }
}

impl fmt::Debug for FreeListAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeListAllocator")
            .field("capacity", &self.capacity)
            .field("operational", &self.is_operational())
            .field("used_bytes", &self.used_bytes)
            .field("free_list", &self.free_list())
            .finish_non_exhaustive()
    }
}

impl Drop for FreeListAllocator {
    fn drop(&mut self) {
        if self.pool.is_null() {
            return;
        }
        // SAFETY: the pool was acquired in `with_config` with exactly this
        // layout (from_size_align succeeded there) and is released once;
        // `pool` is nulled so a second drop cannot happen.
        unsafe {
            dealloc(
                self.pool,
                Layout::from_size_align_unchecked(self.capacity, HEADER_ALIGN),
            );
        }
        self.pool = ptr::null_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_one_spanning_block() {
        let pool = FreeListAllocator::new(1024);
        assert!(pool.is_operational());
        assert_eq!(
            pool.free_list(),
            vec![FreeBlockInfo {
                offset: 0,
                size: 1024
            }]
        );
        assert_eq!(pool.free_bytes(), 1024);
        assert_eq!(pool.used_memory(), 0);
    }

    #[test]
    fn test_request_rounding_keeps_headers_aligned() {
        let mut pool = FreeListAllocator::new(1024);
        let ptr = pool.allocate(1).unwrap();
        assert!(is_aligned(ptr.as_ptr() as usize, HEADER_ALIGN));

        // The remainder block after the split starts aligned too.
        let remainder = pool.free_list()[0];
        assert!(is_aligned(remainder.offset, HEADER_ALIGN));
        unsafe { pool.deallocate(ptr.as_ptr()) };
    }

    #[test]
    fn test_degraded_pool_reports_nothing_usable() {
        let pool = FreeListAllocator::new(HEADER_SIZE - 1);
        assert!(!pool.is_operational());
        assert!(!pool.can_reset());
        assert_eq!(pool.total_memory(), Some(0));
        assert!(pool.free_list().is_empty());
        assert!(pool.blocks().is_empty());
    }
}

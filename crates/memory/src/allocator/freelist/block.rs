//! Intrusive block header and read-only block views
//!
//! The header is written into the first bytes of every block in the pool.
//! For free blocks, the `next`/`prev` fields double as the free-list links;
//! the list borrows its storage from the very memory it tracks, so tracking
//! costs no memory beyond the header every block carries anyway.

use core::mem;

/// Metadata prefixed to every block in the pool.
///
/// `size` counts the whole block *including* this header; the physically
/// next block therefore starts exactly `size` bytes after this header. That
/// address arithmetic, not any stored link, is what coalescing relies on.
///
/// `next`/`prev` are meaningful only while `is_free` is true. While a block
/// is allocated they hold whatever the list left behind and must not be
/// read.
#[repr(C)]
pub(crate) struct BlockHeader {
    pub(crate) size: usize,
    pub(crate) is_free: bool,
    pub(crate) next: *mut BlockHeader,
    pub(crate) prev: *mut BlockHeader,
}

/// Size of the header prefixed to every block.
pub(crate) const HEADER_SIZE: usize = mem::size_of::<BlockHeader>();

/// Alignment every block start must satisfy so its header is naturally
/// aligned. Block sizes are kept multiples of this.
pub(crate) const HEADER_ALIGN: usize = mem::align_of::<BlockHeader>();

/// Whether `candidate` ends exactly where `block` begins.
///
/// This is the explicit adjacency predicate the left-coalesce scan runs
/// against every free-list entry: `address + size == address_of(block)`.
///
/// # Safety
///
/// `candidate` must point to a live block header inside the pool.
#[inline]
pub(crate) unsafe fn is_left_neighbor(
    candidate: *const BlockHeader,
    block: *const BlockHeader,
) -> bool {
    // SAFETY: caller guarantees `candidate` is a valid header, so reading
    // its size is in bounds. The comparison itself is pure address math.
    let size = unsafe { (*candidate).size };
    candidate as usize + size == block as usize
}

/// One free-list entry, as reported by
/// [`FreeListAllocator::free_list`](super::FreeListAllocator::free_list).
///
/// Offsets are relative to the start of the pool, so snapshots are stable
/// across runs and directly comparable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlockInfo {
    /// Byte offset of the block header from the pool start.
    pub offset: usize,
    /// Total block size in bytes, including the header.
    pub size: usize,
}

/// One entry of the physical layout walk, as reported by
/// [`FreeListAllocator::blocks`](super::FreeListAllocator::blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Byte offset of the block header from the pool start.
    pub offset: usize,
    /// Total block size in bytes, including the header.
    pub size: usize,
    /// Block state.
    pub is_free: bool,
}

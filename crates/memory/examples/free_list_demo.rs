//! Demonstration driver for the free-list allocator
//!
//! A plain consumer of the public contract: it allocates, frees and prints
//! free-list snapshots so splitting and coalescing can be watched at work.

use ember_memory::allocator::FreeListAllocator;

fn print_free_list(pool: &FreeListAllocator) {
    println!("--- Free List Status ---");
    let snapshot = pool.free_list();
    if snapshot.is_empty() {
        println!("[EMPTY]");
    }
    for (index, block) in snapshot.iter().enumerate() {
        println!(
            "Block {index:2}: offset = {:5}, size = {:5} bytes",
            block.offset, block.size
        );
    }
    println!("------------------------\n");
}

fn main() {
    const POOL_SIZE: usize = 1024;
    let mut pool = FreeListAllocator::new(POOL_SIZE);

    println!("Initial state:");
    print_free_list(&pool);

    // --- Test 1: Simple allocation & block splitting ---
    println!("--- Test 1: Allocating 100, 200, and 50 bytes ---");
    let p1 = pool.allocate(100).expect("allocation failed");
    let p2 = pool.allocate(200).expect("allocation failed");
    let p3 = pool.allocate(50).expect("allocation failed");

    println!("State after allocations:");
    print_free_list(&pool);

    // --- Test 2: Deallocation & coalescing ---
    println!("--- Test 2: Freeing the middle block (p2) ---");
    unsafe { pool.deallocate(p2.as_ptr()) };
    println!("State after freeing p2:");
    print_free_list(&pool); // Two free blocks now.

    println!("--- Freeing the first block (p1) ---");
    unsafe { pool.deallocate(p1.as_ptr()) };
    println!("State after freeing p1 (coalesces with p2's old space):");
    print_free_list(&pool);

    println!("--- Freeing the last block (p3) ---");
    unsafe { pool.deallocate(p3.as_ptr()) };
    println!("State after freeing p3 (coalesces into one large block):");
    print_free_list(&pool); // Back to a single free block of 1024 bytes.

    // --- Test 3: Stress test ---
    println!("\n--- Test 3: Stress Test ---");
    let mut pointers = Vec::new();
    for _ in 0..5 {
        pointers.push(pool.allocate(60).expect("allocation failed"));
    }
    print_free_list(&pool);

    unsafe {
        pool.deallocate(pointers[1].as_ptr());
        pool.deallocate(pointers[3].as_ptr());
    }
    println!("State after freeing pointers at index 1 and 3:");
    print_free_list(&pool);

    unsafe { pool.deallocate(pointers[2].as_ptr()) };
    println!("State after freeing pointer at index 2 (coalesces 1, 2, and 3):");
    print_free_list(&pool);

    // Clean up remaining allocations
    unsafe {
        pool.deallocate(pointers[0].as_ptr());
        pool.deallocate(pointers[4].as_ptr());
    }
    println!("Final state after all cleanup:");
    print_free_list(&pool);
}

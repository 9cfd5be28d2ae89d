use std::{io::Read, ptr};

use rheap::{HEADER_SIZE, HeapAllocator};

/// Waits until the user presses ENTER.
/// Useful when you want to read the free-list dump between steps, or inspect
/// the arena mapping with tools like `pmap`, `htop`, or `gdb`.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current free list, one node per line (sentinels included).
fn print_free_list(
  label: &str,
  heap: &HeapAllocator,
) {
  println!("[{label}] free list:");
  print!("{}", heap.dump_free_list());
}

fn main() {
  // A small arena makes every split and merge visible in the dump.
  let mut heap = HeapAllocator::with_capacity(4096);

  println!("PID = {}, header size = {} bytes", std::process::id(), HEADER_SIZE);

  // --------------------------------------------------------------------
  // 1) First allocation. This reserves the arena lazily and splits the
  //    initial full-arena block.
  // --------------------------------------------------------------------
  let first = heap.allocate(std::mem::size_of::<u32>()).unwrap();
  println!("\n[1] Allocate u32 -> {:p}", first);

  unsafe {
    // Write something into the allocated memory to show it's usable.
    let first_ptr = first.as_ptr() as *mut u32;
    first_ptr.write(0xDEADBEEF);
    println!("[1] Value written to first block = 0x{:X}", first_ptr.read());
  }

  print_free_list("1", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Allocate 12 bytes (u8[12]).
  //    This shows how "odd-sized" requests round up to the word boundary.
  // --------------------------------------------------------------------
  let second = heap.allocate(12).unwrap();
  println!("\n[2] Allocate [u8; 12] -> {:p}", second);

  unsafe {
    // Initialize the block with a byte pattern.
    ptr::write_bytes(second.as_ptr(), 0xAB, 12);
  }
  println!("[2] Initialized second block with 0xAB");

  print_free_list("2", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Allocate a third block, then free the SECOND one. The hole shows
  //    up as an extra node in the free list.
  // --------------------------------------------------------------------
  let third = heap.allocate(64).unwrap();
  println!("\n[3] Allocate 64 bytes -> {:p}", third);

  unsafe { heap.free(second) };
  println!("[3] Freed second block; note the new middle node:");

  print_free_list("3", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Allocate a small block to see first-fit reuse the hole.
  // --------------------------------------------------------------------
  let fourth = heap.allocate(2).unwrap();
  println!("\n[4] Allocate [u8; 2] -> {:p}", fourth);
  println!(
    "[4] fourth == second? {}",
    if fourth == second {
      "Yes, it reused the freed block"
    } else {
      "No, it allocated somewhere else"
    }
  );

  print_free_list("4", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Free everything. Address-ordered reinsertion plus coalescing
  //    collapse the list back into one full-arena block.
  // --------------------------------------------------------------------
  unsafe {
    heap.free(first);
    heap.free(fourth);
    heap.free(third);
  }
  println!("\n[5] Freed all blocks; the list is a single block again:");

  print_free_list("5", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 6) Exhaustion: a request larger than the arena fails with a typed
  //    error instead of a null pointer.
  // --------------------------------------------------------------------
  let err = heap.allocate(1024 * 1024).unwrap_err();
  println!("\n[6] Oversized request failed as expected: {err}");

  // --------------------------------------------------------------------
  // 7) End of demo. Dropping the allocator unmaps the arena.
  // --------------------------------------------------------------------
  println!("\n[7] End of example. Dropping the allocator returns the arena to the OS.");
}

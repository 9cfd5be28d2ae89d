use std::fmt::Write as _;
use std::ptr::{self, NonNull};
use std::mem;

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, c_void, mmap, munmap};
use log::{debug, trace};

use crate::{
  align,
  align::ALIGNMENT,
  block::{HEADER_SIZE, Header},
  error::AllocError,
};

/// Arena size used by [`HeapAllocator::new`].
pub const DEFAULT_ARENA_SIZE: usize = 1024 * 1024;

/// Snapshot of one free-list node, as reported by
/// [`HeapAllocator::free_blocks`]. Addresses are plain integers so the
/// snapshot can be compared and printed without touching the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
  pub addr: usize,
  pub size: usize,
  pub prev: usize,
  pub next: usize,
}

/// Free-list heap manager over a single fixed-capacity arena.
///
/// The arena is reserved lazily, on the first call to [`allocate`], as one
/// anonymous read/write mapping that never grows. Its first and last header
/// slots hold the head and tail sentinels (`size = 0`); everything between
/// them starts out as one free block. Allocation is a first-fit walk in
/// ascending address order, deallocation reinserts in address order and then
/// coalesces byte-adjacent neighbors.
///
/// Each `HeapAllocator` owns an independent arena; dropping it unmaps the
/// whole region, allocated blocks included.
///
/// [`allocate`]: HeapAllocator::allocate
pub struct HeapAllocator {
  head: *mut Header,
  tail: *mut Header,
  capacity: usize,
}

impl HeapAllocator {
  /// Creates an allocator that will reserve [`DEFAULT_ARENA_SIZE`] bytes on
  /// first use.
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_ARENA_SIZE)
  }

  /// Creates an allocator with a custom arena size. The reservation is
  /// rounded up to the alignment boundary and to the minimum room needed for
  /// the two sentinels and one block header.
  pub fn with_capacity(bytes: usize) -> Self {
    Self {
      head: ptr::null_mut(),
      tail: ptr::null_mut(),
      capacity: align!(bytes).max(3 * HEADER_SIZE),
    }
  }

  /// Payload bytes the arena offers when fully free: the reservation minus
  /// the two sentinel headers and the initial block's header.
  pub fn usable_capacity(&self) -> usize {
    self.capacity - 3 * HEADER_SIZE
  }

  /// One-time arena reservation. Maps the region, places the sentinels at
  /// its lowest and highest header slots and wires one free block between
  /// them.
  fn bootstrap(&mut self) -> Result<(), AllocError> {
    let region = unsafe {
      mmap(
        ptr::null_mut(),
        self.capacity,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if region == MAP_FAILED {
      return Err(AllocError::OutOfMemory { requested: self.capacity });
    }

    unsafe {
      let head = region as *mut Header;
      let first = (region as *mut u8).add(HEADER_SIZE) as *mut Header;
      let tail = (region as *mut u8).add(self.capacity - HEADER_SIZE) as *mut Header;

      (*head).size = 0;
      (*head).prev = ptr::null_mut();
      (*head).next = first;

      (*first).size = self.capacity - 3 * HEADER_SIZE;
      (*first).prev = head;
      (*first).next = tail;

      (*tail).size = 0;
      (*tail).prev = first;
      (*tail).next = ptr::null_mut();

      self.head = head;
      self.tail = tail;
    }

    debug!(
      "reserved {}-byte arena at {:p}, free list initialized",
      self.capacity, self.head
    );

    Ok(())
  }

  /// Returns a pointer to at least `align!(n)` writable bytes.
  ///
  /// First-fit: the walk starts at the lowest-addressed free block and takes
  /// the first one that fits. A block with room to spare beyond one header
  /// is split in place; a block whose remainder could not host a header is
  /// handed out whole, so the payload may exceed the request by up to
  /// `HEADER_SIZE` bytes.
  ///
  /// Fails with [`AllocError::InvalidSize`] when `n == 0` (checked before
  /// anything else, the free list is not touched) and with
  /// [`AllocError::OutOfMemory`] when the initial reservation fails or no
  /// free block fits.
  pub fn allocate(
    &mut self,
    n: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if n == 0 {
      return Err(AllocError::InvalidSize);
    }

    if self.head.is_null() {
      self.bootstrap()?;
    }

    // Rejects requests no block can ever satisfy. Checked before rounding:
    // anything this large would overflow the alignment arithmetic below.
    if n > self.usable_capacity() {
      return Err(AllocError::OutOfMemory { requested: n });
    }

    let needed = align!(n);

    unsafe {
      let mut current = (*self.head).next;

      while current != self.tail {
        if (*current).size > needed + HEADER_SIZE {
          return Ok(split_block(current, needed));
        }

        if (*current).size >= needed {
          return Ok(unlink_block(current));
        }

        current = (*current).next;
      }
    }

    Err(AllocError::OutOfMemory { requested: n })
  }

  /// Reclaims a block previously returned by [`allocate`], reinserting it
  /// into the free list in address order and coalescing adjacent free
  /// blocks.
  ///
  /// # Safety
  ///
  /// `payload` must be a pointer returned by [`allocate`] on this same
  /// allocator and not freed since. Freeing a foreign pointer, or the same
  /// pointer twice, corrupts the free list; no detection is performed beyond
  /// a best-effort bounds check in debug builds.
  ///
  /// [`allocate`]: HeapAllocator::allocate
  pub unsafe fn free(
    &mut self,
    payload: NonNull<u8>,
  ) {
    unsafe {
      let block = Header::from_payload(payload.as_ptr());

      debug_assert!(
        self.owns(block),
        "pointer {payload:p} was not returned by this allocator"
      );

      // The tail sentinel sits above every block, so this walk always stops.
      let mut current = (*self.head).next;
      while (current as usize) <= (block as usize) {
        current = (*current).next;
      }

      (*block).prev = (*current).prev;
      (*block).next = current;
      (*(*current).prev).next = block;
      (*current).prev = block;

      trace!(
        "freed block at {:p} ({} bytes), reinserted before {:p}",
        block,
        (*block).size,
        current
      );

      self.coalesce();
    }
  }

  /// Cheap containment check on the arena-relative offset: catches frees of
  /// pointers outside the arena or at impossible offsets. Not a correctness
  /// guarantee, only a debug aid.
  fn owns(&self, block: *mut Header) -> bool {
    if self.head.is_null() {
      return false;
    }

    let base = self.head as usize;
    let addr = block as usize;

    addr >= base + HEADER_SIZE && addr < self.tail as usize && (addr - base) % ALIGNMENT == 0
  }

  /// Single forward pass restoring the no-adjacency invariant after an
  /// insertion. After each merge the same node is examined again, so a run
  /// of mutually adjacent blocks collapses into one within a single call.
  /// Sentinels are never merged.
  unsafe fn coalesce(&mut self) {
    unsafe {
      let mut current = (*self.head).next;

      while current != self.tail && (*current).next != self.tail {
        let neighbor = (*current).next;

        if neighbor == Header::end(current) {
          (*current).size += HEADER_SIZE + (*neighbor).size;
          (*current).next = (*neighbor).next;
          (*(*neighbor).next).prev = current;

          trace!(
            "merged free block at {:p} into {:p}, now {} bytes",
            neighbor,
            current,
            (*current).size
          );
        } else {
          current = neighbor;
        }
      }
    }
  }

  /// Non-mutating snapshot of the free list, sentinels included, in list
  /// (equals address) order. Empty before the arena is bootstrapped.
  pub fn free_blocks(&self) -> Vec<FreeBlock> {
    let mut nodes = Vec::new();

    if self.head.is_null() {
      return nodes;
    }

    unsafe {
      let mut current = self.head;

      while !current.is_null() {
        nodes.push(FreeBlock {
          addr: current as usize,
          size: (*current).size,
          prev: (*current).prev as usize,
          next: (*current).next as usize,
        });
        current = (*current).next;
      }
    }

    nodes
  }

  /// Human-readable rendering of [`free_blocks`], one node per line. Purely
  /// diagnostic; calling it never mutates the list.
  ///
  /// [`free_blocks`]: HeapAllocator::free_blocks
  pub fn dump_free_list(&self) -> String {
    let mut out = String::new();

    for node in self.free_blocks() {
      let _ = writeln!(
        out,
        "size:{} addr:{:#x} prev:{:#x} next:{:#x}",
        node.size, node.addr, node.prev, node.next
      );
    }

    out
  }
}

impl Default for HeapAllocator {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for HeapAllocator {
  fn drop(&mut self) {
    if self.head.is_null() {
      return;
    }

    debug!("unmapping {}-byte arena at {:p}", self.capacity, self.head);

    unsafe {
      munmap(self.head as *mut c_void, self.capacity);
    }
  }
}

/// Splits `block` in place: the front `needed` bytes are handed out, the
/// remainder gets a fresh header spliced into the list in `block`'s stead.
unsafe fn split_block(
  block: *mut Header,
  needed: usize,
) -> NonNull<u8> {
  unsafe {
    let remainder = (block as *mut u8).add(HEADER_SIZE + needed) as *mut Header;

    (*remainder).size = (*block).size - needed - HEADER_SIZE;
    (*remainder).prev = (*block).prev;
    (*remainder).next = (*block).next;
    (*(*block).prev).next = remainder;
    (*(*block).next).prev = remainder;

    (*block).size = needed;
    (*block).prev = ptr::null_mut();
    (*block).next = ptr::null_mut();

    trace!(
      "split block at {:p}: handing out {} bytes, {} left at {:p}",
      block,
      needed,
      (*remainder).size,
      remainder
    );

    NonNull::new_unchecked(Header::payload(block))
  }
}

/// Removes `block` from the free list entirely and hands out its full
/// payload span.
unsafe fn unlink_block(block: *mut Header) -> NonNull<u8> {
  unsafe {
    (*(*block).prev).next = (*block).next;
    (*(*block).next).prev = (*block).prev;
    (*block).prev = ptr::null_mut();
    (*block).next = ptr::null_mut();

    trace!("consumed whole block at {:p} ({} bytes)", block, (*block).size);

    NonNull::new_unchecked(Header::payload(block))
  }
}

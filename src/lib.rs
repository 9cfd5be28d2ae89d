//! # rheap - A Free-List Heap Manager Library
//!
//! This crate provides an explicit **free-list allocator** implementation in
//! Rust that manages a single fixed-capacity arena obtained once from the
//! operating system via `mmap`.
//!
//! ## Overview
//!
//! The allocator keeps every currently-unallocated block on a doubly linked
//! free list, sorted by ascending address and bounded by two zero-size
//! sentinel headers:
//!
//! ```text
//!   Arena Layout (one anonymous mapping, never grown):
//!
//!   ┌────────┬──────┬─────────┬──────┬────────┬──────┬───────────────┬────────┐
//!   │  HEAD  │ hdr  │ alloc'd │ hdr  │  free  │ hdr  │    free       │  TAIL  │
//!   │sentinel│      │ payload │      │ payload│      │   payload     │sentinel│
//!   │ size=0 │      │         │      │        │      │               │ size=0 │
//!   └────────┴──────┴─────────┴──────┴────────┴──────┴───────────────┴────────┘
//!       │                        ▲      │        ▲                       ▲
//!       │                        │      │        │                       │
//!       └──── next ──────────────┘      └─ next ─┘── ..... ── next ──────┘
//!
//!   Free blocks are linked (next/prev); allocated blocks are linked nowhere.
//!   The list is always sorted by address, which keeps coalescing a single
//!   forward pass.
//! ```
//!
//! Allocation is **first-fit**: the walk starts at the lowest-addressed free
//! block and takes the first one large enough. A generous block is **split**
//! in place; a snug one is handed out whole. Deallocation reinserts the block
//! in address order and **coalesces** byte-adjacent neighbors immediately, so
//! no two free blocks ever touch.
//!
//! ## Crate Structure
//!
//! ```text
//!   rheap
//!   ├── align      - Alignment macro and boundary constant
//!   ├── block      - Block header record (internal)
//!   ├── error      - Typed allocation errors
//!   └── heap       - HeapAllocator implementation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rheap::HeapAllocator;
//!
//! fn main() -> Result<(), rheap::AllocError> {
//!     let mut heap = HeapAllocator::new();
//!
//!     // Allocate 64 bytes; the arena is reserved lazily on this first call.
//!     let ptr = heap.allocate(64)?;
//!
//!     unsafe {
//!         // Use the memory.
//!         ptr.as_ptr().write(42);
//!         assert_eq!(42, ptr.as_ptr().read());
//!
//!         // Give the block back; it is coalesced with its neighbors.
//!         heap.free(ptr);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each block, free or allocated, is prefixed with a fixed-size header:
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │           Payload              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ next: free-list │  │  │                          │  │
//!   │  │ prev: free-list │  │  │   N bytes usable         │  │
//!   │  └─────────────────┘  │  │   (N = align!(request))  │  │
//!   │     HEADER_SIZE       │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! `free` recovers the header by stepping `HEADER_SIZE` bytes back from the
//! pointer it is given. The sentinels guarantee every real block has a
//! predecessor and a successor, so splicing never has to special-case the
//! list ends.
//!
//! ## Features
//!
//! - **Address-ordered free list**: coalescing needs only one forward pass
//! - **In-place splitting**: large blocks are carved without moving data
//! - **Exhaustive coalescing**: adjacent free blocks never persist
//! - **Independent arenas**: each `HeapAllocator` owns its own mapping
//! - **Typed errors**: `OutOfMemory` and `InvalidSize` instead of null returns
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; the handle is
//!   neither `Send` nor `Sync`
//! - **Fixed capacity**: the arena never grows past the initial reservation
//! - **Trusting `free`**: freeing a foreign or already-freed pointer is
//!   undefined behavior (documented precondition, not detected)
//! - **Unix-only**: requires `libc` and `mmap` (POSIX systems)
//!
//! ## Safety
//!
//! Allocation itself is safe to call, but the returned pointer is raw memory:
//! writing through it and returning it via `free` require `unsafe` blocks.

pub mod align;
mod block;
mod error;
mod heap;

pub use block::HEADER_SIZE;
pub use error::AllocError;
pub use heap::{DEFAULT_ARENA_SIZE, FreeBlock, HeapAllocator};

use std::mem;

use crate::align;

/// Metadata record prefixed to every block in the arena, free or allocated.
///
/// `size` counts payload bytes only, never header bytes, and is always a
/// multiple of the alignment boundary. `next` and `prev` are meaningful only
/// while the block sits in the free list; an allocated block keeps its header
/// (so the matching free can recover it) but is linked nowhere.
#[repr(C)]
pub struct Header {
  pub size: usize,
  pub next: *mut Header,
  pub prev: *mut Header,
}

/// Bytes a `Header` occupies in the arena, rounded up to the alignment
/// boundary. A block's payload starts exactly this many bytes past its header.
pub const HEADER_SIZE: usize = align!(mem::size_of::<Header>());

impl Header {
  /// Address of the payload that follows this header.
  pub unsafe fn payload(header: *mut Header) -> *mut u8 {
    unsafe { (header as *mut u8).add(HEADER_SIZE) }
  }

  /// Recovers a block's header from the payload pointer the allocation
  /// engine handed out.
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Header {
    unsafe { payload.sub(HEADER_SIZE) as *mut Header }
  }

  /// First address past this block (header plus payload). A free node
  /// starting exactly here is byte-adjacent and eligible for coalescing.
  pub unsafe fn end(header: *mut Header) -> *mut Header {
    unsafe { (header as *mut u8).add(HEADER_SIZE + (*header).size) as *mut Header }
  }
}

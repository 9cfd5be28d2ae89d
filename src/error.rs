use thiserror::Error;

/// Failures the heap manager can report.
///
/// Freeing a pointer the allocator never returned (or freeing one twice) is
/// not represented here: it is undefined behavior by documented precondition,
/// not a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  /// The initial arena reservation failed, or no free block can satisfy the
  /// request. Recoverable; the allocator never retries on its own.
  #[error("out of memory: no free block can hold {requested} bytes")]
  OutOfMemory {
    /// Bytes the caller asked for.
    requested: usize,
  },

  /// A zero-byte allocation request. This is a caller bug; it is surfaced as
  /// a typed error so the caller decides whether it is fatal.
  #[error("invalid allocation size: zero bytes requested")]
  InvalidSize,
}

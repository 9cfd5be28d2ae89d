/// Alignment boundary for all block sizes and header offsets: one machine
/// word. Every size the heap manager stores or hands out is a multiple of
/// this.
pub const ALIGNMENT: usize = std::mem::size_of::<usize>();

/// Rounds the given size up to the machine word alignment boundary.
///
/// # Examples
///
/// ```rust
/// use std::mem;
/// use rheap::align;
///
/// match mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + mem::size_of::<usize>() - 1) & !(mem::size_of::<usize>() - 1)
  };
}

#[cfg(test)]
mod tests {
  use std::mem;

  #[test]
  fn test_align() {
    let ptr_size = mem::size_of::<usize>();

    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (ptr_size * i + 1)..=(ptr_size * (i + 1));

      let expected_alignment = ptr_size * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(expected, align!(size));
      }
    }
  }

  #[test]
  fn test_aligned_values_are_fixed_points() {
    for i in 1..64 {
      let once = align!(i);
      assert_eq!(once, align!(once));
      assert_eq!(0, once % super::ALIGNMENT);
    }
  }
}

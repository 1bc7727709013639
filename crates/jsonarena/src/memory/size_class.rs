//! Size classes for chunk free lists
//!
//! Chunk sizes are powers of two including the header. Free list `i` holds
//! released chunks of exactly `8 << i` bytes, so any chunk taken from a list
//! fits every request that rounds to the same chunk size:
//!
//! | class | chunk size | usable bytes |
//! |-------|------------|--------------|
//! | 1     | 16         | 0            |
//! | 2     | 32         | 16           |
//! | ...   | ...        | ...          |
//! | 9     | 4096       | 4080         |

use super::heap::HEADER_SIZE;

/// Number of free lists
pub const SIZE_CLASSES: usize = 10;

const MIN_CLASS_SIZE: usize = 8;

/// Free list index for a chunk size, `None` above the largest class
pub fn class_index(size: usize) -> Option<usize> {
    (0..SIZE_CLASSES).find(|&i| (MIN_CLASS_SIZE << i) >= size)
}

/// Header-inclusive chunk size for a request, rounded up to a power of two
pub fn chunk_size(request: usize) -> Option<usize> {
    request.checked_add(HEADER_SIZE)?.checked_next_power_of_two()
}

//! Growable byte buffer living in one arena chunk
//!
//! Backs string bodies while they are decoded and the element, entry and
//! key-index storage of containers.

use super::heap::{ChunkPtr, PageHeap};
use crate::error::ArenaError;

const MIN_CAPACITY: usize = 16;

/// Byte buffer whose storage is a single chunk, grown with `reallocate`
///
/// The buffer does not borrow the heap; every operation takes it explicitly
/// so the parser can keep building other values while a buffer is open.
#[derive(Debug)]
pub(crate) struct ChunkBuf {
    ptr: ChunkPtr,
    len: usize,
    cap: usize,
}

impl ChunkBuf {
    pub(crate) fn new(heap: &mut PageHeap) -> Result<Self, ArenaError> {
        Self::with_capacity(heap, MIN_CAPACITY)
    }

    pub(crate) fn with_capacity(heap: &mut PageHeap, capacity: usize) -> Result<Self, ArenaError> {
        let ptr = heap.allocate(capacity)?;
        let cap = heap.usable_size(ptr)?;
        Ok(Self { ptr, len: 0, cap })
    }

    pub(crate) fn push(&mut self, heap: &mut PageHeap, byte: u8) -> Result<(), ArenaError> {
        self.reserve(heap, 1)?;
        let slot = heap
            .raw_mut(self.ptr, self.cap)
            .get_mut(self.len)
            .ok_or(ArenaError::ForeignChunk)?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn extend_from_slice(
        &mut self,
        heap: &mut PageHeap,
        bytes: &[u8],
    ) -> Result<(), ArenaError> {
        self.reserve(heap, bytes.len())?;
        let dst = heap
            .raw_mut(self.ptr, self.cap)
            .get_mut(self.len..self.len + bytes.len())
            .ok_or(ArenaError::ForeignChunk)?;
        dst.copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Buffer of `len` zero bytes
    pub(crate) fn zeroed(heap: &mut PageHeap, len: usize) -> Result<Self, ArenaError> {
        let mut buf = Self::with_capacity(heap, len)?;
        buf.len = len;
        buf.as_mut_slice(heap).fill(0);
        Ok(buf)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_slice<'h>(&self, heap: &'h PageHeap) -> &'h [u8] {
        heap.raw(self.ptr, self.len)
    }

    pub(crate) fn as_mut_slice<'h>(&self, heap: &'h mut PageHeap) -> &'h mut [u8] {
        heap.raw_mut(self.ptr, self.len)
    }

    /// Give the chunk back to the heap
    pub(crate) fn release(self, heap: &mut PageHeap) -> Result<(), ArenaError> {
        heap.release(self.ptr)
    }

    /// Hand over the chunk and the number of bytes written
    pub(crate) fn finish(self) -> (ChunkPtr, usize) {
        (self.ptr, self.len)
    }

    fn reserve(&mut self, heap: &mut PageHeap, additional: usize) -> Result<(), ArenaError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(ArenaError::TooLarge(usize::MAX))?;
        if needed <= self.cap {
            return Ok(());
        }
        let target = needed.max(self.cap.saturating_mul(2)).max(MIN_CAPACITY);
        self.ptr = heap.reallocate(self.ptr, target)?;
        self.cap = heap.usable_size(self.ptr)?;
        Ok(())
    }
}

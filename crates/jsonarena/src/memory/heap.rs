//! Page-backed, size-classed chunk allocator
//!
//! Memory is served from 4 KiB pages. Each chunk starts with a 16-byte header
//! holding its usable size, a reuse generation and the owner tag of the heap
//! that issued it. A handle is only valid while its generation matches the
//! header, so a released chunk handed out again rejects the old handle.
//! Requests whose header-inclusive size exceeds a page get a standalone block
//! that is dropped as soon as it is released.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::size_class::{self, SIZE_CLASSES};
use crate::error::ArenaError;

/// Page size in bytes
pub const PAGE_SIZE: usize = 4096;

/// Per-chunk header size in bytes
pub const HEADER_SIZE: usize = 16;

/// Owner tag written into released chunks
const FREED: u64 = 0;

/// Pages searched for tail room before a new page is acquired
const CARVE_SCAN: usize = 8;

/// Identity of one arena instance
///
/// Tags are unique for the lifetime of the process and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaTag(NonZeroU64);

impl ArenaTag {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    /// Raw tag value
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Block {
    Page(u32),
    Large(u32),
}

/// Handle to a chunk issued by an arena
///
/// Carries the issuing arena's tag, the block it lives in, the offset of
/// its usable bytes and the generation it was issued under. Only meaningful
/// to the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPtr {
    origin: ArenaTag,
    block: Block,
    offset: u32,
    generation: u32,
}

/// Bytes taken by [`ChunkPtr::pack`]
pub(crate) const PACKED_CHUNK: usize = 13;

impl ChunkPtr {
    /// Tag of the arena that issued this chunk
    pub fn origin(&self) -> ArenaTag {
        self.origin
    }

    /// Whether the chunk lives in a standalone block rather than a page
    pub fn is_large(&self) -> bool {
        matches!(self.block, Block::Large(_))
    }

    fn start(&self) -> usize {
        self.offset as usize
    }

    /// Encode everything but the origin tag
    pub(crate) fn pack(&self) -> [u8; PACKED_CHUNK] {
        let (kind, index) = match self.block {
            Block::Page(index) => (0u8, index),
            Block::Large(index) => (1u8, index),
        };
        let mut out = [0u8; PACKED_CHUNK];
        out[0] = kind;
        out[1..5].copy_from_slice(&index.to_le_bytes());
        out[5..9].copy_from_slice(&self.offset.to_le_bytes());
        out[9..13].copy_from_slice(&self.generation.to_le_bytes());
        out
    }

    /// Rebuild a handle packed by [`ChunkPtr::pack`]
    pub(crate) fn unpack(origin: ArenaTag, raw: &[u8]) -> Option<Self> {
        let word = |at: usize| -> Option<u32> {
            Some(u32::from_le_bytes(raw.get(at..at + 4)?.try_into().ok()?))
        };
        let index = word(1)?;
        let block = match raw.first()? {
            0 => Block::Page(index),
            1 => Block::Large(index),
            _ => return None,
        };
        Some(Self {
            origin,
            block,
            offset: word(5)?,
            generation: word(9)?,
        })
    }
}

/// Chunk header: u32 usable size, u32 generation, u64 owner tag
#[derive(Debug, Clone, Copy)]
struct Header {
    size: u32,
    generation: u32,
    owner: u64,
}

impl Header {
    fn read(block: &[u8], offset: usize) -> Option<Self> {
        let start = offset.checked_sub(HEADER_SIZE)?;
        let raw = block.get(start..offset)?;
        Some(Self {
            size: u32::from_le_bytes(raw[..4].try_into().ok()?),
            generation: u32::from_le_bytes(raw[4..8].try_into().ok()?),
            owner: u64::from_le_bytes(raw[8..].try_into().ok()?),
        })
    }

    fn write(self, block: &mut [u8], offset: usize) {
        let Some(start) = offset.checked_sub(HEADER_SIZE) else {
            return;
        };
        if let Some(raw) = block.get_mut(start..offset) {
            raw[..4].copy_from_slice(&self.size.to_le_bytes());
            raw[4..8].copy_from_slice(&self.generation.to_le_bytes());
            raw[8..].copy_from_slice(&self.owner.to_le_bytes());
        }
    }
}

/// Usable size of a chunk as stored in its header
fn stored_size(alloc_size: usize) -> Result<u32, ArenaError> {
    u32::try_from(alloc_size - HEADER_SIZE).map_err(|_| ArenaError::TooLarge(alloc_size))
}

#[derive(Debug)]
struct Page {
    data: Box<[u8]>,
    used: usize,
}

impl Page {
    fn new() -> Self {
        Self {
            data: vec![0u8; PAGE_SIZE].into_boxed_slice(),
            used: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.used
    }

    fn carve(&mut self, size: usize) -> Option<usize> {
        if self.remaining() < size {
            return None;
        }
        let start = self.used;
        self.used += size;
        Some(start)
    }
}

#[derive(Debug, Clone, Copy)]
struct FreeChunk {
    ptr: ChunkPtr,
    size: u32,
}

/// Snapshot of heap usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Pages currently owned
    pub pages: usize,
    /// Standalone blocks currently alive
    pub large_blocks: usize,
    /// Bytes held from the system allocator (pages plus standalone blocks)
    pub reserved_bytes: usize,
    /// Chunks handed out and not yet released
    pub live_chunks: usize,
    /// Chunks waiting on free lists
    pub free_chunks: usize,
    /// Total successful allocations
    pub allocations: u64,
    /// Allocations served from a free list
    pub free_list_hits: u64,
}

/// Size-classed chunk allocator backing one arena
#[derive(Debug)]
pub struct PageHeap {
    tag: ArenaTag,
    pages: Vec<Page>,
    large: Vec<Option<Box<[u8]>>>,
    free_lists: [Vec<FreeChunk>; SIZE_CLASSES],
    allocations: u64,
    free_list_hits: u64,
    live_chunks: usize,
}

impl PageHeap {
    /// Create an empty heap with a fresh owner tag
    pub fn new() -> Self {
        Self {
            tag: ArenaTag::fresh(),
            pages: Vec::new(),
            large: Vec::new(),
            free_lists: std::array::from_fn(|_| Vec::new()),
            allocations: 0,
            free_list_hits: 0,
            live_chunks: 0,
        }
    }

    /// Owner tag stamped into every chunk this heap issues
    pub fn tag(&self) -> ArenaTag {
        self.tag
    }

    /// Allocate a chunk with at least `size` usable bytes
    pub fn allocate(&mut self, size: usize) -> Result<ChunkPtr, ArenaError> {
        let alloc_size = size_class::chunk_size(size).ok_or(ArenaError::TooLarge(size))?;

        let ptr = if alloc_size > PAGE_SIZE {
            self.allocate_large(alloc_size)?
        } else if let Some(ptr) = self.take_free(alloc_size) {
            ptr
        } else {
            self.carve(alloc_size)?
        };

        self.allocations += 1;
        self.live_chunks += 1;
        Ok(ptr)
    }

    /// Grow a chunk to at least `new_size` usable bytes
    ///
    /// Returns the same handle when the chunk is already large enough or is a
    /// standalone block (resized in place). Otherwise the contents move to a
    /// fresh chunk and the old one is released.
    pub fn reallocate(&mut self, ptr: ChunkPtr, new_size: usize) -> Result<ChunkPtr, ArenaError> {
        let header = self.validate(ptr)?;
        let old_size = header.size as usize;
        if old_size >= new_size {
            return Ok(ptr);
        }

        match ptr.block {
            Block::Large(index) => {
                let alloc_size =
                    size_class::chunk_size(new_size).ok_or(ArenaError::TooLarge(new_size))?;
                let slot = self
                    .large
                    .get_mut(index as usize)
                    .ok_or(ArenaError::ForeignChunk)?;
                let size = stored_size(alloc_size)?;
                let block = slot.take().ok_or(ArenaError::StaleChunk)?;
                let mut data = block.into_vec();
                data.resize(alloc_size, 0);
                Header {
                    size,
                    generation: header.generation,
                    owner: self.tag.get(),
                }
                .write(&mut data, HEADER_SIZE);
                *slot = Some(data.into_boxed_slice());
                trace!(bytes = alloc_size, "resized standalone block");
                Ok(ptr)
            }
            Block::Page(_) => {
                let fresh = self.allocate(new_size)?;
                self.copy(ptr, fresh, old_size);
                self.release(ptr)?;
                Ok(fresh)
            }
        }
    }

    /// Return a chunk to this heap
    ///
    /// Page chunks go to the free list of their size class. Standalone
    /// blocks are handed straight back to the system allocator.
    pub fn release(&mut self, ptr: ChunkPtr) -> Result<(), ArenaError> {
        let header = self.validate(ptr)?;

        match ptr.block {
            Block::Large(index) => {
                if let Some(slot) = self.large.get_mut(index as usize) {
                    *slot = None;
                }
                trace!(bytes = header.size, "released standalone block");
            }
            Block::Page(index) => {
                if let Some(page) = self.pages.get_mut(index as usize) {
                    Header {
                        owner: FREED,
                        ..header
                    }
                    .write(&mut page.data, ptr.start());
                }
                let chunk_size = header.size as usize + HEADER_SIZE;
                if let Some(class) = size_class::class_index(chunk_size) {
                    self.free_lists[class].push(FreeChunk {
                        ptr,
                        size: header.size,
                    });
                }
            }
        }

        self.live_chunks = self.live_chunks.saturating_sub(1);
        Ok(())
    }

    /// Usable bytes of a live chunk
    pub fn bytes(&self, ptr: ChunkPtr) -> Result<&[u8], ArenaError> {
        let header = self.validate(ptr)?;
        Ok(self.raw(ptr, header.size as usize))
    }

    /// Mutable usable bytes of a live chunk
    pub fn bytes_mut(&mut self, ptr: ChunkPtr) -> Result<&mut [u8], ArenaError> {
        let header = self.validate(ptr)?;
        Ok(self.raw_mut(ptr, header.size as usize))
    }

    /// Usable size recorded in a live chunk's header
    pub fn usable_size(&self, ptr: ChunkPtr) -> Result<usize, ArenaError> {
        Ok(self.validate(ptr)?.size as usize)
    }

    /// Current usage snapshot
    pub fn stats(&self) -> HeapStats {
        let live_large = self.large.iter().flatten();
        HeapStats {
            pages: self.pages.len(),
            large_blocks: live_large.clone().count(),
            reserved_bytes: self.pages.len() * PAGE_SIZE
                + live_large.map(|block| block.len()).sum::<usize>(),
            live_chunks: self.live_chunks,
            free_chunks: self.free_lists.iter().map(Vec::len).sum(),
            allocations: self.allocations,
            free_list_hits: self.free_list_hits,
        }
    }

    /// First `len` bytes of a chunk, without header validation
    pub(crate) fn raw(&self, ptr: ChunkPtr, len: usize) -> &[u8] {
        self.block(ptr.block)
            .and_then(|block| block.get(ptr.start()..ptr.start() + len))
            .unwrap_or_default()
    }

    /// Mutable first `len` bytes of a chunk, without header validation
    pub(crate) fn raw_mut(&mut self, ptr: ChunkPtr, len: usize) -> &mut [u8] {
        self.block_mut(ptr.block)
            .and_then(|block| block.get_mut(ptr.start()..ptr.start() + len))
            .unwrap_or_default()
    }

    fn validate(&self, ptr: ChunkPtr) -> Result<Header, ArenaError> {
        if ptr.origin != self.tag {
            warn!(
                owner = self.tag.get(),
                origin = ptr.origin.get(),
                "chunk handed to an arena that did not allocate it"
            );
            return Err(ArenaError::ForeignChunk);
        }

        let block = match ptr.block {
            Block::Page(index) => self
                .pages
                .get(index as usize)
                .map(|page| &page.data[..])
                .ok_or(ArenaError::ForeignChunk)?,
            Block::Large(index) => match self.large.get(index as usize) {
                Some(Some(block)) => &block[..],
                Some(None) => return Err(ArenaError::StaleChunk),
                None => return Err(ArenaError::ForeignChunk),
            },
        };

        let header = Header::read(block, ptr.start()).ok_or(ArenaError::ForeignChunk)?;
        match header.owner {
            FREED => Err(ArenaError::StaleChunk),
            owner if owner == self.tag.get() => {
                if header.generation == ptr.generation {
                    Ok(header)
                } else {
                    Err(ArenaError::StaleChunk)
                }
            }
            owner => {
                warn!(owner, expected = self.tag.get(), "chunk header owner mismatch");
                Err(ArenaError::ForeignChunk)
            }
        }
    }

    fn block(&self, block: Block) -> Option<&[u8]> {
        match block {
            Block::Page(index) => self.pages.get(index as usize).map(|page| &page.data[..]),
            Block::Large(index) => self.large.get(index as usize)?.as_deref(),
        }
    }

    fn block_mut(&mut self, block: Block) -> Option<&mut [u8]> {
        match block {
            Block::Page(index) => self
                .pages
                .get_mut(index as usize)
                .map(|page| &mut page.data[..]),
            Block::Large(index) => self.large.get_mut(index as usize)?.as_deref_mut(),
        }
    }

    fn take_free(&mut self, alloc_size: usize) -> Option<ChunkPtr> {
        let class = size_class::class_index(alloc_size)?;
        let chunk = self.free_lists[class].pop()?;
        let ptr = ChunkPtr {
            generation: chunk.ptr.generation.wrapping_add(1),
            ..chunk.ptr
        };

        if let Block::Page(index) = ptr.block {
            if let Some(page) = self.pages.get_mut(index as usize) {
                Header {
                    size: chunk.size,
                    generation: ptr.generation,
                    owner: self.tag.get(),
                }
                .write(&mut page.data, ptr.start());
            }
        }

        self.free_list_hits += 1;
        trace!(
            class,
            size = chunk.size,
            generation = ptr.generation,
            "reused chunk from free list"
        );
        Some(ptr)
    }

    fn carve(&mut self, alloc_size: usize) -> Result<ChunkPtr, ArenaError> {
        let first = self.pages.len().saturating_sub(CARVE_SCAN);
        let found = self.pages[first..]
            .iter_mut()
            .enumerate()
            .rev()
            .find_map(|(i, page)| page.carve(alloc_size).map(|start| (first + i, start)));

        let (index, start) = match found {
            Some(found) => found,
            None => {
                let mut page = Page::new();
                let start = page
                    .carve(alloc_size)
                    .ok_or(ArenaError::TooLarge(alloc_size))?;
                self.pages.push(page);
                trace!(pages = self.pages.len(), "acquired arena page");
                (self.pages.len() - 1, start)
            }
        };

        let block = Block::Page(u32::try_from(index).map_err(|_| ArenaError::TooLarge(alloc_size))?);
        let offset = start + HEADER_SIZE;
        Header {
            size: stored_size(alloc_size)?,
            generation: 0,
            owner: self.tag.get(),
        }
        .write(&mut self.pages[index].data, offset);

        Ok(ChunkPtr {
            origin: self.tag,
            block,
            offset: u32::try_from(offset).map_err(|_| ArenaError::TooLarge(alloc_size))?,
            generation: 0,
        })
    }

    fn allocate_large(&mut self, alloc_size: usize) -> Result<ChunkPtr, ArenaError> {
        let index =
            u32::try_from(self.large.len()).map_err(|_| ArenaError::TooLarge(alloc_size))?;
        let size = stored_size(alloc_size)?;
        let mut data = vec![0u8; alloc_size].into_boxed_slice();
        Header {
            size,
            generation: 0,
            owner: self.tag.get(),
        }
        .write(&mut data, HEADER_SIZE);
        self.large.push(Some(data));
        trace!(bytes = alloc_size, "allocated standalone block");

        Ok(ChunkPtr {
            origin: self.tag,
            block: Block::Large(index),
            offset: HEADER_SIZE as u32,
            generation: 0,
        })
    }

    fn copy(&mut self, src: ChunkPtr, dst: ChunkPtr, len: usize) {
        if src.block == dst.block {
            if let Some(block) = self.block_mut(src.block) {
                block.copy_within(src.start()..src.start() + len, dst.start());
            }
            return;
        }
        let staged: SmallVec<[u8; 256]> = SmallVec::from_slice(self.raw(src, len));
        self.raw_mut(dst, len).copy_from_slice(&staged);
    }
}

impl Default for PageHeap {
    fn default() -> Self {
        Self::new()
    }
}

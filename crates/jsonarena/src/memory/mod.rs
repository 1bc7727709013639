//! Memory management: chunk heap, growable chunk buffers and the value arena

pub mod arena;
pub(crate) mod buf;
pub mod heap;
pub mod size_class;

pub use arena::{Arena, ArenaStats};
pub use heap::{ArenaTag, ChunkPtr, HEADER_SIZE, HeapStats, PAGE_SIZE, PageHeap};

//! Array storage and read view

use super::slot::{self, SLOT_SIZE};
use super::{JsonValue, Node};
use crate::error::ArenaError;
use crate::memory::buf::ChunkBuf;
use crate::memory::{Arena, PageHeap};

/// Slots reserved by the first push
const INITIAL_SLOTS: usize = 4;

/// Append-only element list whose slots live in one arena chunk
///
/// The chunk is taken on the first push, so empty arrays hold no memory.
#[derive(Debug, Default)]
pub(crate) struct ArrayData {
    body: Option<ChunkBuf>,
}

impl ArrayData {
    pub(crate) fn push(&mut self, heap: &mut PageHeap, value: JsonValue) -> Result<(), ArenaError> {
        let body = match self.body.take() {
            Some(body) => body,
            None => ChunkBuf::with_capacity(heap, INITIAL_SLOTS * SLOT_SIZE)?,
        };
        self.body.insert(body).extend_from_slice(heap, &slot::encode(value))
    }

    pub(crate) fn len(&self) -> usize {
        self.body.as_ref().map_or(0, |body| body.len() / SLOT_SIZE)
    }

    pub(crate) fn slots<'h>(&self, heap: &'h PageHeap) -> &'h [u8] {
        self.body
            .as_ref()
            .map(|body| body.as_slice(heap))
            .unwrap_or_default()
    }
}

/// Borrowed view of an array
#[derive(Clone, Copy)]
pub struct Array<'a> {
    arena: &'a Arena,
    data: &'a ArrayData,
}

impl<'a> Array<'a> {
    pub(crate) fn new(arena: &'a Arena, data: &'a ArrayData) -> Self {
        Self { arena, data }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        let start = index.checked_mul(SLOT_SIZE)?;
        let end = start.checked_add(SLOT_SIZE)?;
        let raw = self.data.slots(self.arena.heap()).get(start..end)?;
        let value = slot::decode(self.arena.tag(), raw)?;
        Some(Node::new(self.arena, value))
    }

    /// Elements in insertion order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Node<'a>> + use<'a> {
        let arena = self.arena;
        self.values().map(move |value| Node::new(arena, value))
    }

    /// Raw element values (handles are only meaningful with this arena)
    pub fn values(&self) -> impl ExactSizeIterator<Item = JsonValue> + use<'a> {
        let tag = self.arena.tag();
        self.data
            .slots(self.arena.heap())
            .chunks_exact(SLOT_SIZE)
            .map(move |raw| slot::decode(tag, raw).unwrap_or_default())
    }
}

impl<'b> PartialEq<Array<'b>> for Array<'_> {
    fn eq(&self, other: &Array<'b>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl std::fmt::Debug for Array<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

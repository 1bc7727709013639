//! Arena owning every node of a parsed document
//!
//! Every string, array element list, object entry list and key index lives
//! in [`PageHeap`] chunks. Array and object handles index small side tables
//! that record which chunks hold each container. Dropping or resetting the
//! arena releases everything at once.

use ahash::RandomState;
use tracing::debug;

use super::heap::{ArenaTag, ChunkPtr, HeapStats, PageHeap};
use crate::error::ArenaError;
use crate::value::array::ArrayData;
use crate::value::object::ObjectData;
use crate::value::{ArrayRef, JsonValue, Node, ObjectRef, StrRef};

/// Arena usage snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    /// Chunk heap counters
    pub heap: HeapStats,
    /// Arrays created since the last reset
    pub arrays: usize,
    /// Objects created since the last reset
    pub objects: usize,
}

/// Page-based arena for JSON values
#[derive(Debug)]
pub struct Arena {
    heap: PageHeap,
    arrays: Vec<ArrayData>,
    objects: Vec<ObjectData>,
    hasher: RandomState,
}

impl Arena {
    /// Create an empty arena with a fresh tag
    pub fn new() -> Self {
        Self {
            heap: PageHeap::new(),
            arrays: Vec::new(),
            objects: Vec::new(),
            hasher: RandomState::new(),
        }
    }

    /// Identity of this arena
    pub fn tag(&self) -> ArenaTag {
        self.heap.tag()
    }

    /// Allocate a chunk of at least `size` bytes
    pub fn allocate(&mut self, size: usize) -> Result<ChunkPtr, ArenaError> {
        self.heap.allocate(size)
    }

    /// Grow or shrink a chunk, preserving its contents
    pub fn reallocate(&mut self, ptr: ChunkPtr, new_size: usize) -> Result<ChunkPtr, ArenaError> {
        self.heap.reallocate(ptr, new_size)
    }

    /// Return a chunk to the arena
    pub fn release(&mut self, ptr: ChunkPtr) -> Result<(), ArenaError> {
        self.heap.release(ptr)
    }

    /// Usable bytes of a live chunk
    pub fn bytes(&self, ptr: ChunkPtr) -> Result<&[u8], ArenaError> {
        self.heap.bytes(ptr)
    }

    /// Mutable usable bytes of a live chunk
    pub fn bytes_mut(&mut self, ptr: ChunkPtr) -> Result<&mut [u8], ArenaError> {
        self.heap.bytes_mut(ptr)
    }

    /// Copy a string into the arena
    pub fn alloc_str(&mut self, s: &str) -> Result<JsonValue, ArenaError> {
        self.store_str(s).map(JsonValue::String)
    }

    fn store_str(&mut self, s: &str) -> Result<StrRef, ArenaError> {
        let chunk = self.heap.allocate(s.len())?;
        self.heap.raw_mut(chunk, s.len()).copy_from_slice(s.as_bytes());
        Ok(StrRef {
            chunk,
            len: s.len(),
        })
    }

    /// Create an empty array
    ///
    /// No chunk is taken until the first element is pushed.
    pub fn new_array(&mut self) -> Result<ArrayRef, ArenaError> {
        let index = table_index(self.arrays.len())?;
        self.arrays.push(ArrayData::default());
        Ok(ArrayRef {
            origin: self.tag(),
            index,
        })
    }

    /// Append a value to an array
    pub fn push(&mut self, array: ArrayRef, value: JsonValue) -> Result<(), ArenaError> {
        self.check(value)?;
        if array.origin != self.tag() {
            return Err(ArenaError::ForeignHandle);
        }
        let data = self
            .arrays
            .get_mut(array.index as usize)
            .ok_or(ArenaError::ForeignHandle)?;
        data.push(&mut self.heap, value)
    }

    /// Create an empty object
    ///
    /// No chunk is taken until the first member is inserted.
    pub fn new_object(&mut self) -> Result<ObjectRef, ArenaError> {
        let index = table_index(self.objects.len())?;
        self.objects.push(ObjectData::default());
        Ok(ObjectRef {
            origin: self.tag(),
            index,
        })
    }

    /// Insert a member, copying the key into the arena
    ///
    /// Returns the replaced value when the key was already present.
    pub fn insert(
        &mut self,
        object: ObjectRef,
        key: &str,
        value: JsonValue,
    ) -> Result<Option<JsonValue>, ArenaError> {
        self.check(value)?;
        if self.object_data(object).is_none() {
            return Err(ArenaError::ForeignHandle);
        }
        let key = self.store_str(key)?;
        self.insert_key(object, key, value)
    }

    /// Insert a member whose key already lives in this arena
    ///
    /// On a duplicate the first key keeps its position and the new key's
    /// chunk is released.
    pub(crate) fn insert_key(
        &mut self,
        object: ObjectRef,
        key: StrRef,
        value: JsonValue,
    ) -> Result<Option<JsonValue>, ArenaError> {
        self.check(value)?;
        if object.origin != self.tag() || key.chunk.origin() != self.tag() {
            return Err(ArenaError::ForeignHandle);
        }
        let data = self
            .objects
            .get_mut(object.index as usize)
            .ok_or(ArenaError::ForeignHandle)?;
        let previous = data.insert(&mut self.heap, &self.hasher, key, value)?;
        if previous.is_some() {
            self.heap.release(key.chunk)?;
        }
        Ok(previous)
    }

    /// Pair a value with this arena for reading
    pub fn node(&self, value: JsonValue) -> Result<Node<'_>, ArenaError> {
        self.check(value)?;
        Ok(Node::new(self, value))
    }

    /// Usage snapshot
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            heap: self.heap.stats(),
            arrays: self.arrays.len(),
            objects: self.objects.len(),
        }
    }

    /// Release every page, block and container at once
    ///
    /// The arena gets a new tag, so handles issued before the reset are
    /// rejected afterwards.
    pub fn reset(&mut self) {
        let before = self.stats();
        debug!(
            pages = before.heap.pages,
            arrays = before.arrays,
            objects = before.objects,
            "Resetting arena"
        );
        self.heap = PageHeap::new();
        self.arrays.clear();
        self.objects.clear();
    }

    pub(crate) fn heap(&self) -> &PageHeap {
        &self.heap
    }

    pub(crate) fn heap_mut(&mut self) -> &mut PageHeap {
        &mut self.heap
    }

    pub(crate) fn try_str(&self, s: StrRef) -> Option<&str> {
        let bytes = self.heap.bytes(s.chunk).ok()?.get(..s.len)?;
        std::str::from_utf8(bytes).ok()
    }

    pub(crate) fn array_data(&self, array: ArrayRef) -> Option<&ArrayData> {
        if array.origin != self.tag() {
            return None;
        }
        self.arrays.get(array.index as usize)
    }

    pub(crate) fn object_data(&self, object: ObjectRef) -> Option<&ObjectData> {
        if object.origin != self.tag() {
            return None;
        }
        self.objects.get(object.index as usize)
    }

    pub(crate) fn find_key(&self, data: &ObjectData, key: &[u8]) -> Option<usize> {
        data.find(&self.heap, &self.hasher, key)
    }

    fn check(&self, value: JsonValue) -> Result<(), ArenaError> {
        let owned = match value {
            JsonValue::String(s) => s.chunk.origin() == self.tag(),
            JsonValue::Array(a) => self.array_data(a).is_some(),
            JsonValue::Object(o) => self.object_data(o).is_some(),
            _ => true,
        };
        if owned {
            Ok(())
        } else {
            Err(ArenaError::ForeignHandle)
        }
    }
}

fn table_index(len: usize) -> Result<u32, ArenaError> {
    u32::try_from(len).map_err(|_| ArenaError::TooLarge(len))
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

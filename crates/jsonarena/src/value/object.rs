//! Object storage and read view
//!
//! Entries keep insertion order in one arena chunk, each a key slot followed
//! by a value slot. Small objects are searched linearly; once an object grows
//! past [`INDEX_THRESHOLD`] entries an open-addressing index over the key
//! hashes is built in a second chunk and maintained from then on.

use ahash::RandomState;
use smallvec::SmallVec;

use super::slot::{self, SLOT_SIZE};
use super::{JsonValue, Node, StrRef};
use crate::error::ArenaError;
use crate::memory::buf::ChunkBuf;
use crate::memory::{Arena, PageHeap};

/// Entry count above which key lookups go through a hash index
pub const INDEX_THRESHOLD: usize = 8;

/// Bytes per entry: key slot then value slot
const ENTRY_SIZE: usize = 2 * SLOT_SIZE;

/// Entries reserved by the first insert
const INITIAL_ENTRIES: usize = 4;

/// Smallest index table, in buckets
const MIN_BUCKETS: usize = 32;

/// Bytes per index bucket: entry position plus one, zero when empty
const BUCKET_SIZE: usize = 4;

/// Hash index over entry positions, linear probing, load factor at most 1/2
#[derive(Debug)]
struct KeyIndex {
    table: ChunkBuf,
    buckets: usize,
}

impl KeyIndex {
    fn with_buckets(heap: &mut PageHeap, buckets: usize) -> Result<Self, ArenaError> {
        let bytes = buckets
            .checked_mul(BUCKET_SIZE)
            .ok_or(ArenaError::TooLarge(buckets))?;
        Ok(Self {
            table: ChunkBuf::zeroed(heap, bytes)?,
            buckets,
        })
    }

    fn fits(&self, entries: usize) -> bool {
        entries.saturating_mul(2) <= self.buckets
    }

    fn insert(&mut self, heap: &mut PageHeap, hash: u64, position: u32) -> Result<(), ArenaError> {
        let stored = position
            .checked_add(1)
            .ok_or(ArenaError::TooLarge(position as usize))?;
        let mask = self.buckets - 1;
        let table = self.table.as_mut_slice(heap);
        let mut i = hash as usize & mask;
        for _ in 0..self.buckets {
            let at = i * BUCKET_SIZE;
            let bucket = table
                .get_mut(at..at + BUCKET_SIZE)
                .ok_or(ArenaError::ForeignChunk)?;
            if bucket.iter().all(|&b| b == 0) {
                bucket.copy_from_slice(&stored.to_le_bytes());
                return Ok(());
            }
            i = (i + 1) & mask;
        }
        Err(ArenaError::TooLarge(self.buckets))
    }

    fn lookup(
        &self,
        heap: &PageHeap,
        hash: u64,
        matches: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let mask = self.buckets - 1;
        let table = self.table.as_slice(heap);
        let mut i = hash as usize & mask;
        for _ in 0..self.buckets {
            let at = i * BUCKET_SIZE;
            let stored = u32::from_le_bytes(table.get(at..at + BUCKET_SIZE)?.try_into().ok()?);
            let position = stored.checked_sub(1)? as usize;
            if matches(position) {
                return Some(position);
            }
            i = (i + 1) & mask;
        }
        None
    }
}

/// Key/value entries owned by an arena, keys unique
#[derive(Debug, Default)]
pub(crate) struct ObjectData {
    entries: Option<ChunkBuf>,
    index: Option<KeyIndex>,
}

impl ObjectData {
    pub(crate) fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.len() / ENTRY_SIZE)
    }

    fn raw<'h>(&self, heap: &'h PageHeap) -> &'h [u8] {
        self.entries
            .as_ref()
            .map(|entries| entries.as_slice(heap))
            .unwrap_or_default()
    }

    fn key_at(&self, heap: &PageHeap, i: usize) -> Option<StrRef> {
        let start = i.checked_mul(ENTRY_SIZE)?;
        let raw = self.raw(heap).get(start..start.checked_add(SLOT_SIZE)?)?;
        match slot::decode(heap.tag(), raw)? {
            JsonValue::String(key) => Some(key),
            _ => None,
        }
    }

    pub(crate) fn value_at(&self, heap: &PageHeap, i: usize) -> Option<JsonValue> {
        let start = i.checked_mul(ENTRY_SIZE)?.checked_add(SLOT_SIZE)?;
        slot::decode(heap.tag(), self.raw(heap).get(start..start.checked_add(SLOT_SIZE)?)?)
    }

    /// Entries in insertion order as `(key, value)` pairs
    fn entries<'h>(
        &self,
        heap: &'h PageHeap,
    ) -> impl ExactSizeIterator<Item = (&'h str, JsonValue)> + use<'h> {
        let tag = heap.tag();
        self.raw(heap).chunks_exact(ENTRY_SIZE).map(move |entry| {
            let (key, value) = entry.split_at(SLOT_SIZE);
            let key = match slot::decode(tag, key) {
                Some(JsonValue::String(key)) => {
                    std::str::from_utf8(heap.raw(key.chunk, key.len))
                }
                _ => Ok(""),
            };
            (
                key.unwrap_or_default(),
                slot::decode(tag, value).unwrap_or_default(),
            )
        })
    }

    pub(crate) fn find(&self, heap: &PageHeap, hasher: &RandomState, key: &[u8]) -> Option<usize> {
        self.find_hashed(heap, hasher.hash_one(key), key)
    }

    fn find_hashed(&self, heap: &PageHeap, hash: u64, key: &[u8]) -> Option<usize> {
        let matches = |i: usize| {
            self.key_at(heap, i)
                .is_some_and(|k| heap.raw(k.chunk, k.len) == key)
        };
        match &self.index {
            Some(index) => index.lookup(heap, hash, matches),
            None => (0..self.len()).find(|&i| matches(i)),
        }
    }

    /// Insert or overwrite; returns the previous value for an existing key
    ///
    /// An overwritten entry keeps its original position and key handle.
    pub(crate) fn insert(
        &mut self,
        heap: &mut PageHeap,
        hasher: &RandomState,
        key: StrRef,
        value: JsonValue,
    ) -> Result<Option<JsonValue>, ArenaError> {
        let (hash, existing) = {
            let bytes = heap.raw(key.chunk, key.len);
            let hash = hasher.hash_one(bytes);
            (hash, self.find_hashed(heap, hash, bytes))
        };

        if let Some(i) = existing {
            let previous = self.value_at(heap, i);
            let start = i * ENTRY_SIZE + SLOT_SIZE;
            if let Some(entries) = &self.entries {
                entries
                    .as_mut_slice(heap)
                    .get_mut(start..start + SLOT_SIZE)
                    .ok_or(ArenaError::ForeignChunk)?
                    .copy_from_slice(&slot::encode(value));
            }
            return Ok(previous);
        }

        let len = self.len();
        let position = u32::try_from(len).map_err(|_| ArenaError::TooLarge(len))?;
        let mut entry = [0u8; ENTRY_SIZE];
        entry[..SLOT_SIZE].copy_from_slice(&slot::encode(JsonValue::String(key)));
        entry[SLOT_SIZE..].copy_from_slice(&slot::encode(value));
        let entries = match self.entries.take() {
            Some(entries) => entries,
            None => ChunkBuf::with_capacity(heap, INITIAL_ENTRIES * ENTRY_SIZE)?,
        };
        self.entries.insert(entries).extend_from_slice(heap, &entry)?;

        let len = len + 1;
        if let Some(index) = self.index.as_mut().filter(|index| index.fits(len)) {
            index.insert(heap, hash, position)?;
        } else if len > INDEX_THRESHOLD {
            self.rebuild_index(heap, hasher)?;
        }
        Ok(None)
    }

    fn rebuild_index(
        &mut self,
        heap: &mut PageHeap,
        hasher: &RandomState,
    ) -> Result<(), ArenaError> {
        let len = self.len();
        let reader: &PageHeap = heap;
        let hashes: SmallVec<[u64; 32]> = (0..len)
            .map(|i| {
                let key = self.key_at(reader, i).ok_or(ArenaError::ForeignChunk)?;
                Ok(hasher.hash_one(reader.raw(key.chunk, key.len)))
            })
            .collect::<Result<_, ArenaError>>()?;

        let buckets = len
            .saturating_mul(2)
            .checked_next_power_of_two()
            .ok_or(ArenaError::TooLarge(len))?
            .max(MIN_BUCKETS);
        let mut index = KeyIndex::with_buckets(heap, buckets)?;
        for (position, hash) in hashes.into_iter().enumerate() {
            let position = u32::try_from(position).map_err(|_| ArenaError::TooLarge(len))?;
            index.insert(heap, hash, position)?;
        }

        if let Some(old) = self.index.replace(index) {
            old.table.release(heap)?;
        }
        Ok(())
    }
}

/// Borrowed view of an object
#[derive(Clone, Copy)]
pub struct Object<'a> {
    arena: &'a Arena,
    data: &'a ObjectData,
}

impl<'a> Object<'a> {
    pub(crate) fn new(arena: &'a Arena, data: &'a ObjectData) -> Self {
        Self { arena, data }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the object has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        let i = self.arena.find_key(self.data, key.as_bytes())?;
        let value = self.data.value_at(self.arena.heap(), i)?;
        Some(Node::new(self.arena, value))
    }

    /// Check if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.arena.find_key(self.data, key.as_bytes()).is_some()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a str, Node<'a>)> + use<'a> {
        let arena = self.arena;
        self.data
            .entries(arena.heap())
            .map(move |(key, value)| (key, Node::new(arena, value)))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &'a str> + use<'a> {
        self.data.entries(self.arena.heap()).map(|(key, _)| key)
    }
}

impl<'b> PartialEq<Object<'b>> for Object<'_> {
    fn eq(&self, other: &Object<'b>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value == theirs))
    }
}

impl std::fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

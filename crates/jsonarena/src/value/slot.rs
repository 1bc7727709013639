//! Fixed-width byte encoding of values inside container chunks
//!
//! Layout of one slot, all integers little-endian:
//!
//! | bytes  | contents                                         |
//! |--------|--------------------------------------------------|
//! | 0      | kind                                             |
//! | 1..14  | packed chunk handle (strings)                    |
//! | 4..8   | table index (arrays, objects)                    |
//! | 8..16  | `i64` or `f64` bits (numbers)                    |
//! | 16..24 | byte length (strings)                            |
//!
//! The arena tag is not stored; handles decode with the tag of the arena
//! whose chunk holds the slot.

use super::{ArrayRef, JsonNumber, JsonValue, ObjectRef, StrRef};
use crate::memory::ArenaTag;
use crate::memory::heap::{ChunkPtr, PACKED_CHUNK};

/// Bytes per encoded value
pub(crate) const SLOT_SIZE: usize = 24;

const NULL: u8 = 0;
const FALSE: u8 = 1;
const TRUE: u8 = 2;
const INT: u8 = 3;
const DOUBLE: u8 = 4;
const STRING: u8 = 5;
const ARRAY: u8 = 6;
const OBJECT: u8 = 7;

pub(crate) fn encode(value: JsonValue) -> [u8; SLOT_SIZE] {
    let mut slot = [0u8; SLOT_SIZE];
    match value {
        JsonValue::Null => slot[0] = NULL,
        JsonValue::Bool(false) => slot[0] = FALSE,
        JsonValue::Bool(true) => slot[0] = TRUE,
        JsonValue::Number(JsonNumber::Int(v)) => {
            slot[0] = INT;
            slot[8..16].copy_from_slice(&v.to_le_bytes());
        }
        JsonValue::Number(JsonNumber::Double(v)) => {
            slot[0] = DOUBLE;
            slot[8..16].copy_from_slice(&v.to_bits().to_le_bytes());
        }
        JsonValue::String(s) => {
            slot[0] = STRING;
            slot[1..1 + PACKED_CHUNK].copy_from_slice(&s.chunk.pack());
            slot[16..24].copy_from_slice(&(s.len as u64).to_le_bytes());
        }
        JsonValue::Array(a) => {
            slot[0] = ARRAY;
            slot[4..8].copy_from_slice(&a.index.to_le_bytes());
        }
        JsonValue::Object(o) => {
            slot[0] = OBJECT;
            slot[4..8].copy_from_slice(&o.index.to_le_bytes());
        }
    }
    slot
}

pub(crate) fn decode(origin: ArenaTag, slot: &[u8]) -> Option<JsonValue> {
    let slot: &[u8; SLOT_SIZE] = slot.get(..SLOT_SIZE)?.try_into().ok()?;
    let index = || u32::from_le_bytes([slot[4], slot[5], slot[6], slot[7]]);
    let payload = || {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&slot[8..16]);
        raw
    };

    let value = match slot[0] {
        NULL => JsonValue::Null,
        FALSE => JsonValue::Bool(false),
        TRUE => JsonValue::Bool(true),
        INT => JsonValue::Number(JsonNumber::Int(i64::from_le_bytes(payload()))),
        DOUBLE => JsonValue::Number(JsonNumber::Double(f64::from_bits(u64::from_le_bytes(
            payload(),
        )))),
        STRING => {
            let chunk = ChunkPtr::unpack(origin, &slot[1..1 + PACKED_CHUNK])?;
            let mut len = [0u8; 8];
            len.copy_from_slice(&slot[16..24]);
            JsonValue::String(StrRef {
                chunk,
                len: usize::try_from(u64::from_le_bytes(len)).ok()?,
            })
        }
        ARRAY => JsonValue::Array(ArrayRef {
            origin,
            index: index(),
        }),
        OBJECT => JsonValue::Object(ObjectRef {
            origin,
            index: index(),
        }),
        _ => return None,
    };
    Some(value)
}

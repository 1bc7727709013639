//! JSON value model
//!
//! [`JsonValue`] is a small `Copy` tagged union. Scalars are stored inline;
//! strings, arrays and objects are handles into the [`Arena`] that built them.
//! Copying a value is shallow: it duplicates the tag and payload or handle,
//! never the pointee. To read through handles, pair a value with its arena
//! as a [`Node`].
//!
//! [`Arena`]: crate::memory::Arena

pub mod array;
pub mod node;
pub mod object;
pub(crate) mod slot;

pub use array::Array;
pub use node::Node;
pub use object::Object;

use std::fmt;

use crate::memory::{ArenaTag, ChunkPtr};

/// JSON number, either an exact 64-bit integer or a double
///
/// Equality is variant-strict: `Int(1) != Double(1.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonNumber {
    /// Literal without fraction or exponent
    Int(i64),
    /// Literal with a fraction or exponent
    Double(f64),
}

impl JsonNumber {
    /// Integer payload, if this is the integer variant
    pub fn as_i64(self) -> Option<i64> {
        match self {
            JsonNumber::Int(v) => Some(v),
            JsonNumber::Double(_) => None,
        }
    }

    /// Value as a double (integers are converted)
    pub fn as_f64(self) -> f64 {
        match self {
            JsonNumber::Int(v) => v as f64,
            JsonNumber::Double(v) => v,
        }
    }

    /// Check for the integer variant
    pub fn is_integer(self) -> bool {
        matches!(self, JsonNumber::Int(_))
    }
}

impl From<i64> for JsonNumber {
    fn from(value: i64) -> Self {
        JsonNumber::Int(value)
    }
}

impl From<f64> for JsonNumber {
    fn from(value: f64) -> Self {
        JsonNumber::Double(value)
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNumber::Int(v) => write!(f, "{v}"),
            JsonNumber::Double(v) => write!(f, "{v:?}"),
        }
    }
}

/// Handle to a string stored in arena chunk memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrRef {
    pub(crate) chunk: ChunkPtr,
    pub(crate) len: usize,
}

impl StrRef {
    /// Length of the string in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check for the empty string
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Handle to an array owned by an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayRef {
    pub(crate) origin: ArenaTag,
    pub(crate) index: u32,
}

/// Handle to an object owned by an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub(crate) origin: ArenaTag,
    pub(crate) index: u32,
}

/// JSON value: exactly one of six variants
///
/// The derived `PartialEq` compares handles by identity. Structural
/// comparison goes through [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum JsonValue {
    /// `null`
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Number
    Number(JsonNumber),
    /// String handle
    String(StrRef),
    /// Array handle
    Array(ArrayRef),
    /// Object handle
    Object(ObjectRef),
}

/// Variant tag of a [`JsonValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// Boolean
    Bool,
    /// Number
    Number,
    /// String
    String,
    /// Array
    Array,
    /// Object
    Object,
}

impl ValueKind {
    /// Lowercase name for messages
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl JsonValue {
    /// Active variant
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Null => ValueKind::Null,
            JsonValue::Bool(_) => ValueKind::Bool,
            JsonValue::Number(_) => ValueKind::Number,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::Object(_) => ValueKind::Object,
        }
    }

    /// Check for `null`
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Number payload
    pub fn as_number(&self) -> Option<JsonNumber> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Array handle
    pub fn as_array_ref(&self) -> Option<ArrayRef> {
        match self {
            JsonValue::Array(a) => Some(*a),
            _ => None,
        }
    }

    /// Object handle
    pub fn as_object_ref(&self) -> Option<ObjectRef> {
        match self {
            JsonValue::Object(o) => Some(*o),
            _ => None,
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(JsonNumber::Int(value))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(JsonNumber::Double(value))
    }
}

impl From<JsonNumber> for JsonValue {
    fn from(value: JsonNumber) -> Self {
        JsonValue::Number(value)
    }
}

impl From<ArrayRef> for JsonValue {
    fn from(value: ArrayRef) -> Self {
        JsonValue::Array(value)
    }
}

impl From<ObjectRef> for JsonValue {
    fn from(value: ObjectRef) -> Self {
        JsonValue::Object(value)
    }
}

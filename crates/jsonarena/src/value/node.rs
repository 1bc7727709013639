//! Arena-bound read view over a [`JsonValue`]

use std::fmt;

use serde::ser::{Error as _, Serialize, Serializer};

use super::{Array, JsonNumber, JsonValue, Object, ValueKind};
use crate::memory::Arena;

/// A value paired with the arena that owns its handles
///
/// Equality is structural and works across arenas: two nodes are equal when
/// they have the same variant and equal contents, with object entries
/// compared regardless of order.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    arena: &'a Arena,
    value: JsonValue,
}

impl<'a> Node<'a> {
    pub(crate) fn new(arena: &'a Arena, value: JsonValue) -> Self {
        Self { arena, value }
    }

    /// Underlying value
    pub fn value(&self) -> JsonValue {
        self.value
    }

    /// Owning arena
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Active variant
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Check for `null`
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Check for a boolean
    pub fn is_bool(&self) -> bool {
        self.kind() == ValueKind::Bool
    }

    /// Check for a number
    pub fn is_number(&self) -> bool {
        self.kind() == ValueKind::Number
    }

    /// Check for a string
    pub fn is_string(&self) -> bool {
        self.kind() == ValueKind::String
    }

    /// Check for an array
    pub fn is_array(&self) -> bool {
        self.kind() == ValueKind::Array
    }

    /// Check for an object
    pub fn is_object(&self) -> bool {
        self.kind() == ValueKind::Object
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    /// Number payload
    pub fn as_number(&self) -> Option<JsonNumber> {
        self.value.as_number()
    }

    /// Integer payload
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number()?.as_i64()
    }

    /// Number as a double, converting integers
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(JsonNumber::as_f64)
    }

    /// String contents
    pub fn as_str(&self) -> Option<&'a str> {
        match self.value {
            JsonValue::String(s) => self.arena.try_str(s),
            _ => None,
        }
    }

    /// Array view
    pub fn as_array(&self) -> Option<Array<'a>> {
        let handle = self.value.as_array_ref()?;
        let data = self.arena.array_data(handle)?;
        Some(Array::new(self.arena, data))
    }

    /// Object view
    pub fn as_object(&self) -> Option<Object<'a>> {
        let handle = self.value.as_object_ref()?;
        let data = self.arena.object_data(handle)?;
        Some(Object::new(self.arena, data))
    }

    /// Member lookup on an object
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.as_object()?.get(key)
    }

    /// Element lookup on an array
    pub fn at(&self, index: usize) -> Option<Node<'a>> {
        self.as_array()?.get(index)
    }
}

impl<'b> PartialEq<Node<'b>> for Node<'_> {
    fn eq(&self, other: &Node<'b>) -> bool {
        match (self.value, other.value) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Number(a), JsonValue::Number(b)) => a == b,
            (JsonValue::String(_), JsonValue::String(_)) => match (self.as_str(), other.as_str()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            (JsonValue::Array(_), JsonValue::Array(_)) => {
                match (self.as_array(), other.as_array()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (JsonValue::Object(_), JsonValue::Object(_)) => {
                match (self.as_object(), other.as_object()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => write!(f, "{b}"),
            JsonValue::Number(n) => write!(f, "{n}"),
            JsonValue::String(_) => match self.as_str() {
                Some(s) => write!(f, "{s:?}"),
                None => f.write_str("<dangling string>"),
            },
            JsonValue::Array(_) => match self.as_array() {
                Some(array) => fmt::Debug::fmt(&array, f),
                None => f.write_str("<foreign array>"),
            },
            JsonValue::Object(_) => match self.as_object() {
                Some(object) => fmt::Debug::fmt(&object, f),
                None => f.write_str("<foreign object>"),
            },
        }
    }
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(b),
            JsonValue::Number(JsonNumber::Int(v)) => serializer.serialize_i64(v),
            JsonValue::Number(JsonNumber::Double(v)) => serializer.serialize_f64(v),
            JsonValue::String(_) => match self.as_str() {
                Some(s) => serializer.serialize_str(s),
                None => Err(S::Error::custom("string handle does not resolve in its arena")),
            },
            JsonValue::Array(_) => match self.as_array() {
                Some(array) => array.serialize(serializer),
                None => Err(S::Error::custom("array handle belongs to another arena")),
            },
            JsonValue::Object(_) => match self.as_object() {
                Some(object) => object.serialize(serializer),
                None => Err(S::Error::custom("object handle belongs to another arena")),
            },
        }
    }
}

impl Serialize for Array<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for Object<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

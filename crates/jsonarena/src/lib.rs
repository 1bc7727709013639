//! # jsonarena
//!
//! RFC 8259 JSON parser that builds its value tree on a page-based,
//! size-classed arena.
//!
//! The crate is organised leaves first:
//! - [`unicode`]: UTF-8 encoding and UTF-16 surrogate handling
//! - [`number`]: literal to integer/double conversion with range outcomes
//! - [`memory`]: chunk heap and the [`Arena`] that owns parsed values
//! - [`value`]: the [`JsonValue`] tagged union and its read views
//! - [`parser`]: recursive-descent parser over a [`ByteSource`]
//!
//! ```
//! use jsonarena::{Arena, ErrorCode, parse};
//!
//! let mut arena = Arena::new();
//! let root = parse(br#"{"id": 7, "tags": ["a", "b"]}"#, &mut arena).unwrap();
//! let node = arena.node(root).unwrap();
//! assert_eq!(node.get("id").and_then(|n| n.as_i64()), Some(7));
//!
//! let result = parse(b"[1,]", &mut arena);
//! assert_eq!(ErrorCode::of(&result), ErrorCode::Invalid);
//! ```

#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod document;
pub mod error;
pub mod memory;
pub mod number;
pub mod parser;
pub mod source;
pub mod unicode;
pub mod value;

pub use config::ParserConfig;
pub use document::Document;
pub use error::{ArenaError, Error, ErrorCode, ParseError, Result, Stage};
pub use memory::{Arena, ArenaStats, ArenaTag, ChunkPtr, HeapStats};
pub use number::{ConvertState, Converted};
pub use parser::{Parser, parse};
pub use source::{ByteSource, ReaderSource, SliceSource};
pub use value::{
    Array, ArrayRef, JsonNumber, JsonValue, Node, Object, ObjectRef, StrRef, ValueKind,
};

//! Owned parse result: an arena plus its root value

use std::io::Read;
use std::str::FromStr;

use crate::config::ParserConfig;
use crate::error::{Error, ParseError, Result};
use crate::memory::{Arena, ArenaStats};
use crate::parser::Parser;
use crate::source::ReaderSource;
use crate::value::{JsonValue, Node};

/// Parsed JSON document
///
/// Owns the arena that backs every node, so the tree lives exactly as long
/// as the document.
#[derive(Debug)]
pub struct Document {
    arena: Arena,
    root: JsonValue,
}

impl Document {
    /// Parse a document from bytes with the default configuration
    pub fn parse(input: &[u8]) -> Result<Self> {
        Self::parse_with_config(input, ParserConfig::default())
    }

    /// Parse a document from a string
    pub fn parse_str(input: &str) -> Result<Self> {
        Self::parse(input.as_bytes())
    }

    /// Parse a document with a custom configuration
    pub fn parse_with_config(input: &[u8], config: ParserConfig) -> Result<Self> {
        let mut arena = Arena::new();
        let root = Parser::with_config(config).parse(input, &mut arena)?;
        Ok(Self { arena, root })
    }

    /// Parse a document pulled from a reader
    ///
    /// A read error is reported as [`Error::Io`] even when the truncated
    /// input also failed to parse.
    pub fn from_reader<R: Read>(reader: R, config: ParserConfig) -> Result<Self> {
        let mut arena = Arena::new();
        let mut source = ReaderSource::new(reader);
        let parsed = Parser::with_config(config).parse_source(&mut source, &mut arena);
        if let Some(err) = source.take_error() {
            return Err(err.into());
        }
        let root = parsed?;
        Ok(Self { arena, root })
    }

    /// Root node
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.arena, self.root)
    }

    /// Root value handle
    pub fn root_value(&self) -> JsonValue {
        self.root
    }

    /// Backing arena
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Arena usage
    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Split into the arena and root value
    pub fn into_parts(self) -> (Arena, JsonValue) {
        (self.arena, self.root)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl TryFrom<&[u8]> for Document {
    type Error = ParseError;

    fn try_from(input: &[u8]) -> std::result::Result<Self, ParseError> {
        let mut arena = Arena::new();
        let root = Parser::new().parse(input, &mut arena)?;
        Ok(Self { arena, root })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::error::ErrorCode;

    struct FailAfter<'a>(&'a [u8]);

    impl Read for FailAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::other("connection reset"));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_parse_str() {
        let doc: Document = r#"{"name": "jsonarena", "tags": [1, 2.5]}"#.parse().unwrap();
        let root = doc.root();
        assert_eq!(root.get("name").and_then(|n| n.as_str()), Some("jsonarena"));
        assert_eq!(root.get("tags").unwrap().as_array().unwrap().len(), 2);
        assert!(doc.stats().heap.pages >= 1);
    }

    #[test]
    fn test_parse_error_code() {
        let err = Document::parse(b"[1,]").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Invalid));
    }

    #[test]
    fn test_from_reader() {
        let doc = Document::from_reader(&b" [true] "[..], ParserConfig::default()).unwrap();
        assert_eq!(doc.root().at(0).and_then(|n| n.as_bool()), Some(true));
    }

    #[test]
    fn test_from_reader_surfaces_io_error() {
        let err = Document::from_reader(FailAfter(b"[1, 2"), ParserConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(msg) if msg == "connection reset"));
    }

    #[test]
    fn test_into_parts() {
        let doc = Document::try_from(&b"\"x\""[..]).unwrap();
        let (arena, root) = doc.into_parts();
        assert_eq!(arena.node(root).unwrap().as_str(), Some("x"));
    }
}

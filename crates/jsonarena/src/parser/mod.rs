//! Recursive-descent JSON parser
//!
//! The parser pulls bytes from a [`ByteSource`], picks a sub-parser from the
//! first non-whitespace byte and builds values in an [`Arena`]. The first
//! failure at any depth aborts the whole parse; no partial tree is returned.
//! Memory taken from the arena before a failure is not rolled back, so the
//! arena should be discarded or reset after an error.

pub mod combinator;
mod container;
mod depth;
mod literal;
mod number;
mod string;

use tracing::{debug, warn};

use self::depth::DepthGuard;
use crate::config::ParserConfig;
use crate::error::{ArenaError, ErrorCode, ParseError, Stage};
use crate::memory::Arena;
use crate::source::{ByteSource, SliceSource};
use crate::value::JsonValue;

/// Parse a complete document from memory with the default configuration
pub fn parse(input: &[u8], arena: &mut Arena) -> Result<JsonValue, ParseError> {
    Parser::new().parse(input, arena)
}

/// JSON parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a byte range into `arena`
    pub fn parse(&self, input: &[u8], arena: &mut Arena) -> Result<JsonValue, ParseError> {
        debug!(len = input.len(), "Parsing JSON input");
        self.parse_source(&mut SliceSource::new(input), arena)
    }

    /// Parse one document pulled from `source` into `arena`
    pub fn parse_source<S: ByteSource>(
        &self,
        source: &mut S,
        arena: &mut Arena,
    ) -> Result<JsonValue, ParseError> {
        let mut session = Session {
            src: source,
            arena,
            depth: DepthGuard::with_max_depth(self.config.max_depth),
        };

        let result = session.value().and_then(|root| {
            if !self.config.allow_trailing {
                session.skip_whitespace();
                if !session.src.is_eof() {
                    return Err(session.error(ErrorCode::Invalid, Stage::Trailing));
                }
            }
            Ok(root)
        });

        match &result {
            Ok(root) => debug!(
                consumed = session.src.position(),
                root = %root.kind(),
                pages = session.arena.stats().heap.pages,
                "Parsed JSON document"
            ),
            Err(err) => debug!(
                code = %err.code,
                stage = %err.stage,
                position = err.position,
                "JSON parse failed"
            ),
        }
        result
    }
}

/// State of one parse call
pub(crate) struct Session<'s, S> {
    src: &'s mut S,
    arena: &'s mut Arena,
    depth: DepthGuard,
}

impl<S: ByteSource> Session<'_, S> {
    /// Parse any value at the cursor
    fn value(&mut self) -> Result<JsonValue, ParseError> {
        self.skip_whitespace();
        match self.src.peek() {
            None => Err(self.error(ErrorCode::Eof, Stage::Value)),
            Some(b'n') => self.literal(b"null", Stage::Null).map(|()| JsonValue::Null),
            Some(b't') => self.literal(b"true", Stage::Bool).map(|()| JsonValue::Bool(true)),
            Some(b'f') => self
                .literal(b"false", Stage::Bool)
                .map(|()| JsonValue::Bool(false)),
            Some(b'-' | b'0'..=b'9') => self.number().map(JsonValue::Number),
            Some(b'"') => self.string().map(JsonValue::String),
            Some(b'[') => self.array(),
            Some(b'{') => self.object(),
            Some(_) => Err(self.error(ErrorCode::Invalid, Stage::Value)),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.src.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.src.next();
        }
    }

    fn error(&self, code: ErrorCode, stage: Stage) -> ParseError {
        ParseError::new(code, stage, self.src.position())
    }

    /// `Eof` when the source is exhausted, `Invalid` otherwise
    fn unexpected(&mut self, stage: Stage) -> ParseError {
        let code = if self.src.is_eof() {
            ErrorCode::Eof
        } else {
            ErrorCode::Invalid
        };
        self.error(code, stage)
    }

    fn arena_error(&self, err: ArenaError, stage: Stage) -> ParseError {
        warn!(error = %err, %stage, "Arena rejected parser allocation");
        self.error(ErrorCode::Invalid, stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::JsonNumber;

    fn code(input: &str) -> ErrorCode {
        let mut arena = Arena::new();
        ErrorCode::of(&parse(input.as_bytes(), &mut arena))
    }

    #[test]
    fn test_dispatch() {
        let mut arena = Arena::new();
        assert_eq!(parse(b"null", &mut arena), Ok(JsonValue::Null));
        assert_eq!(parse(b" true ", &mut arena), Ok(JsonValue::Bool(true)));
        assert_eq!(parse(b"\tfalse\n", &mut arena), Ok(JsonValue::Bool(false)));
        assert_eq!(
            parse(b"-12", &mut arena),
            Ok(JsonValue::Number(JsonNumber::Int(-12)))
        );
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(code(""), ErrorCode::Eof);
        assert_eq!(code("   "), ErrorCode::Eof);
        assert_eq!(code("x"), ErrorCode::Invalid);
        assert_eq!(code("+1"), ErrorCode::Invalid);
        assert_eq!(code("\u{feff}null"), ErrorCode::Invalid);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut arena = Arena::new();
        let err = parse(b"1 2", &mut arena).unwrap_err();
        assert_eq!(err.code, ErrorCode::Invalid);
        assert_eq!(err.stage, Stage::Trailing);
        assert_eq!(err.position, 2);

        let lenient = Parser::with_config(ParserConfig::lenient());
        assert_eq!(
            lenient.parse(b"1 2", &mut arena),
            Ok(JsonValue::Number(JsonNumber::Int(1)))
        );
    }

    #[test]
    fn test_parse_from_reader_source() {
        let mut arena = Arena::new();
        let mut src = crate::source::ReaderSource::new(&b"[1, 2]"[..]);
        let root = Parser::new().parse_source(&mut src, &mut arena).unwrap();
        let node = arena.node(root).unwrap();
        assert_eq!(node.as_array().map(|a| a.len()), Some(2));
    }
}

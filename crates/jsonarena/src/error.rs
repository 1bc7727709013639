//! Error types for parsing and arena operations

use std::fmt;

use crate::value::JsonNumber;

/// Result type alias for jsonarena operations
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a parse, as a flat code
///
/// Every failure of the parser maps onto exactly one of these. `Ok` exists so
/// that a parse result can be reported as `(value, code)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Parse completed
    Ok,
    /// Input exhausted while a token was incomplete
    Eof,
    /// A byte violates the grammar at the current position
    Invalid,
    /// Numeric literal exceeds the target representation
    Overflow,
    /// Numeric literal is below the target's representable precision
    Underflow,
    /// Nesting exceeded the configured depth ceiling
    DepthExceeded,
}

impl ErrorCode {
    /// Map a parse outcome onto its code
    pub fn of<T>(result: &std::result::Result<T, ParseError>) -> Self {
        match result {
            Ok(_) => ErrorCode::Ok,
            Err(err) => err.code,
        }
    }

    /// Check if this code denotes success
    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Ok => "ok",
            ErrorCode::Eof => "unexpected end of input",
            ErrorCode::Invalid => "invalid syntax",
            ErrorCode::Overflow => "numeric overflow",
            ErrorCode::Underflow => "numeric underflow",
            ErrorCode::DepthExceeded => "nesting too deep",
        };
        f.write_str(name)
    }
}

/// Sub-parser active when an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Value dispatch (lookahead did not select a sub-parser)
    Value,
    /// `null` literal
    Null,
    /// `true`/`false` literal
    Bool,
    /// Number literal
    Number,
    /// Quoted string
    String,
    /// Array body
    Array,
    /// Object body
    Object,
    /// Bytes after the root value
    Trailing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Value => "value",
            Stage::Null => "null",
            Stage::Bool => "bool",
            Stage::Number => "number",
            Stage::String => "string",
            Stage::Array => "array",
            Stage::Object => "object",
            Stage::Trailing => "trailing input",
        };
        f.write_str(name)
    }
}

/// Parse failure with location and, for range errors, the clamped value
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{code} while parsing {stage} at byte {position}")]
pub struct ParseError {
    /// Error code
    pub code: ErrorCode,
    /// Sub-parser that failed
    pub stage: Stage,
    /// Byte offset of the cursor when the error was detected
    pub position: usize,
    /// Sentinel produced by the number converter on overflow/underflow
    pub clamped: Option<JsonNumber>,
}

impl ParseError {
    /// Create a parse error without a clamped value
    pub fn new(code: ErrorCode, stage: Stage, position: usize) -> Self {
        Self {
            code,
            stage,
            position,
            clamped: None,
        }
    }

    /// Create a numeric range error carrying the converter's sentinel
    pub fn range(code: ErrorCode, position: usize, clamped: JsonNumber) -> Self {
        Self {
            code,
            stage: Stage::Number,
            position,
            clamped: Some(clamped),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

/// Arena usage errors
///
/// These are contract violations by the caller, never input errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// Chunk was not issued by this arena
    #[error("chunk was not allocated by this arena")]
    ForeignChunk,

    /// Chunk was already released
    #[error("chunk was already released")]
    StaleChunk,

    /// Array, object or string handle belongs to another arena
    #[error("handle belongs to another arena")]
    ForeignHandle,

    /// Requested size cannot be described by a chunk header
    #[error("allocation of {0} bytes is too large")]
    TooLarge(usize),
}

/// Main error type for jsonarena operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Input rejected by the parser
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Arena misuse
    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),

    /// I/O error while pulling from a reader
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Parse error code, if this is a parse failure
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Parse(err) => Some(err.code),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_of_result() {
        let ok: std::result::Result<u8, ParseError> = Ok(1);
        assert_eq!(ErrorCode::of(&ok), ErrorCode::Ok);

        let err: std::result::Result<u8, ParseError> =
            Err(ParseError::new(ErrorCode::Eof, Stage::String, 3));
        assert_eq!(ErrorCode::of(&err), ErrorCode::Eof);
        assert!(!ErrorCode::of(&err).is_ok());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(ErrorCode::Invalid, Stage::Number, 7);
        assert_eq!(
            err.to_string(),
            "invalid syntax while parsing number at byte 7"
        );
    }

    #[test]
    fn test_range_error_keeps_sentinel() {
        let err = ParseError::range(ErrorCode::Overflow, 4, JsonNumber::Int(i64::MAX));
        assert_eq!(err.stage, Stage::Number);
        assert_eq!(err.clamped, Some(JsonNumber::Int(i64::MAX)));
    }

    #[test]
    fn test_error_conversions() {
        let err: Error = ParseError::new(ErrorCode::Invalid, Stage::Value, 0).into();
        assert_eq!(err.code(), Some(ErrorCode::Invalid));

        let err: Error = ArenaError::ForeignChunk.into();
        assert_eq!(err.code(), None);
        assert_eq!(
            err.to_string(),
            "Arena error: chunk was not allocated by this arena"
        );
    }
}

//! Number lexer
//!
//! Greedily matches `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
//! and hands the literal to the converter.

use super::Session;
use super::combinator::{Lexeme, Match, many0, many1, one, optional};
use crate::error::{ErrorCode, ParseError, Stage};
use crate::number::{self, ConvertState};
use crate::source::ByteSource;
use crate::value::JsonNumber;

fn digit(b: u8) -> bool {
    b.is_ascii_digit()
}

impl<S: ByteSource> Session<'_, S> {
    pub(super) fn number(&mut self) -> Result<JsonNumber, ParseError> {
        let mut lexeme = Lexeme::new();
        if self.lex_number(&mut lexeme) != Match::Matched {
            return Err(self.unexpected(Stage::Number));
        }

        let converted = std::str::from_utf8(&lexeme)
            .ok()
            .and_then(number::convert)
            .ok_or_else(|| self.error(ErrorCode::Invalid, Stage::Number))?;

        let position = self.src.position();
        match converted.state {
            ConvertState::Ok => Ok(converted.value),
            ConvertState::Overflow => Err(ParseError::range(
                ErrorCode::Overflow,
                position,
                converted.value,
            )),
            ConvertState::Underflow => Err(ParseError::range(
                ErrorCode::Underflow,
                position,
                converted.value,
            )),
        }
    }

    fn lex_number(&mut self, out: &mut Lexeme) -> Match {
        let src = &mut *self.src;
        optional(src, out, |b| b == b'-');

        let int = if one(src, out, |b| b == b'0').is_matched() {
            if src.peek().is_some_and(digit) {
                return Match::Failed;
            }
            Match::Matched
        } else {
            one(src, out, |b| matches!(b, b'1'..=b'9')).and_then(|| many0(src, out, digit))
        };
        if int != Match::Matched {
            return if out.is_empty() { int } else { Match::Failed };
        }

        let frac = one(src, out, |b| b == b'.').and_then(|| many1(src, out, digit));
        if frac == Match::Failed {
            return frac;
        }

        one(src, out, |b| matches!(b, b'e' | b'E'))
            .and_then(|| optional(src, out, |b| matches!(b, b'+' | b'-')))
            .and_then(|| many1(src, out, digit))
            .or_skip()
    }
}

//! Quoted strings and escape decoding

use super::Session;
use crate::error::{ErrorCode, ParseError, Stage};
use crate::memory::buf::ChunkBuf;
use crate::source::ByteSource;
use crate::unicode::{self, UTF8_MAX};
use crate::value::StrRef;

impl<S: ByteSource> Session<'_, S> {
    /// Parse a quoted string into an arena chunk
    ///
    /// The cursor must be on the opening quote.
    pub(super) fn string(&mut self) -> Result<StrRef, ParseError> {
        self.src.next();
        let mut buf = ChunkBuf::new(self.arena.heap_mut())
            .map_err(|err| self.arena_error(err, Stage::String))?;

        loop {
            let byte = match self.src.next() {
                Some(b'"') => break,
                Some(b'\\') => self.escape(&mut buf)?,
                Some(b) if b < 0x20 => return Err(self.error(ErrorCode::Invalid, Stage::String)),
                Some(b) => Some(b),
                None => return Err(self.error(ErrorCode::Eof, Stage::String)),
            };
            if let Some(b) = byte {
                buf.push(self.arena.heap_mut(), b)
                    .map_err(|err| self.arena_error(err, Stage::String))?;
            }
        }

        if std::str::from_utf8(buf.as_slice(self.arena.heap())).is_err() {
            return Err(self.error(ErrorCode::Invalid, Stage::String));
        }
        let (chunk, len) = buf.finish();
        Ok(StrRef { chunk, len })
    }

    /// Decode the escape after a backslash
    ///
    /// Single-byte escapes are returned; `\u` sequences are written to `buf`
    /// directly and yield `None`.
    fn escape(&mut self, buf: &mut ChunkBuf) -> Result<Option<u8>, ParseError> {
        let byte = match self.src.next() {
            Some(b'"') => b'"',
            Some(b'\\') => b'\\',
            Some(b'/') => b'/',
            Some(b'b') => 0x08,
            Some(b'f') => 0x0C,
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'u') => {
                let cp = self.codepoint()?;
                let mut encoded = [0u8; UTF8_MAX];
                let n = unicode::encode_utf8(cp, &mut encoded)
                    .ok_or_else(|| self.error(ErrorCode::Invalid, Stage::String))?;
                self.push(buf, &encoded[..n])?;
                return Ok(None);
            }
            Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::String)),
            None => return Err(self.error(ErrorCode::Eof, Stage::String)),
        };
        Ok(Some(byte))
    }

    /// Decode the hex digits of a `\u` escape, joining surrogate pairs
    fn codepoint(&mut self) -> Result<u32, ParseError> {
        let high = self.hex4()?;
        if unicode::is_low_surrogate(high) {
            return Err(self.error(ErrorCode::Invalid, Stage::String));
        }
        if !unicode::is_high_surrogate(high) {
            return Ok(high);
        }

        for expected in [b'\\', b'u'] {
            match self.src.next() {
                Some(b) if b == expected => {}
                Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::String)),
                None => return Err(self.error(ErrorCode::Eof, Stage::String)),
            }
        }
        let low = self.hex4()?;
        unicode::decode_pair(high, low).ok_or_else(|| self.error(ErrorCode::Invalid, Stage::String))
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = match self.src.next() {
                Some(b) => unicode::hex_value(b)
                    .ok_or_else(|| self.error(ErrorCode::Invalid, Stage::String))?,
                None => return Err(self.error(ErrorCode::Eof, Stage::String)),
            };
            value = (value << 4) | u32::from(digit);
        }
        Ok(value)
    }

    fn push(&mut self, buf: &mut ChunkBuf, bytes: &[u8]) -> Result<(), ParseError> {
        buf.extend_from_slice(self.arena.heap_mut(), bytes)
            .map_err(|err| self.arena_error(err, Stage::String))
    }
}

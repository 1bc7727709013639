//! `null`, `true` and `false`

use super::Session;
use crate::error::{ErrorCode, ParseError, Stage};
use crate::source::ByteSource;

impl<S: ByteSource> Session<'_, S> {
    /// Match a fixed token byte-for-byte
    ///
    /// Too few remaining bytes is `Eof`, any differing byte is `Invalid`.
    pub(super) fn literal(&mut self, token: &[u8], stage: Stage) -> Result<(), ParseError> {
        let got = self.src.take(token.len());
        if got.len() < token.len() {
            return Err(self.error(ErrorCode::Eof, stage));
        }
        if got.as_slice() != token {
            return Err(self.error(ErrorCode::Invalid, stage));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorCode, Stage};
    use crate::memory::Arena;
    use crate::parser::parse;

    #[test]
    fn test_truncated_literal_is_eof() {
        let mut arena = Arena::new();
        for input in ["n", "nul", "tru", "fals"] {
            let err = parse(input.as_bytes(), &mut arena).unwrap_err();
            assert_eq!(err.code, ErrorCode::Eof, "{input}");
        }
    }

    #[test]
    fn test_misspelled_literal_is_invalid() {
        let mut arena = Arena::new();
        let err = parse(b"nulL", &mut arena).unwrap_err();
        assert_eq!(err.code, ErrorCode::Invalid);
        assert_eq!(err.stage, Stage::Null);

        let err = parse(b"trie", &mut arena).unwrap_err();
        assert_eq!(err.stage, Stage::Bool);
        assert_eq!(err.code, ErrorCode::Invalid);
    }
}

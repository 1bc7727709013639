//! Three-way byte matchers used by the lexers
//!
//! Each matcher inspects a [`ByteSource`] and appends what it consumes to a
//! [`Lexeme`] buffer. Outcomes distinguish "did not apply" from "applied and
//! then broke", which a boolean cannot.

use smallvec::SmallVec;

use crate::source::ByteSource;

/// Scratch buffer collecting matched bytes
pub type Lexeme = SmallVec<[u8; 32]>;

/// Matcher outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Matched and consumed input
    Matched,
    /// Did not match, nothing consumed
    Skipped,
    /// Consumed input, then failed
    Failed,
}

impl Match {
    /// Sequence: run `next` only after a match
    ///
    /// A skip in the second part becomes a failure because the first part
    /// already consumed input.
    pub fn and_then(self, next: impl FnOnce() -> Match) -> Match {
        match self {
            Match::Matched => match next() {
                Match::Skipped => Match::Failed,
                other => other,
            },
            other => other,
        }
    }

    /// Treat a skip as success
    pub fn or_skip(self) -> Match {
        match self {
            Match::Skipped => Match::Matched,
            other => other,
        }
    }

    /// Check for [`Match::Matched`]
    pub fn is_matched(self) -> bool {
        self == Match::Matched
    }
}

/// Match exactly one byte satisfying `pred`
pub fn one<S: ByteSource>(src: &mut S, out: &mut Lexeme, pred: impl Fn(u8) -> bool) -> Match {
    match src.peek() {
        Some(b) if pred(b) => {
            src.next();
            out.push(b);
            Match::Matched
        }
        _ => Match::Skipped,
    }
}

/// Match zero or one byte satisfying `pred`; never skips
pub fn optional<S: ByteSource>(
    src: &mut S,
    out: &mut Lexeme,
    pred: impl Fn(u8) -> bool,
) -> Match {
    one(src, out, pred).or_skip()
}

/// Match any number of bytes satisfying `pred`; never skips
pub fn many0<S: ByteSource>(src: &mut S, out: &mut Lexeme, pred: impl Fn(u8) -> bool) -> Match {
    while one(src, out, &pred).is_matched() {}
    Match::Matched
}

/// Match one or more bytes satisfying `pred`
pub fn many1<S: ByteSource>(src: &mut S, out: &mut Lexeme, pred: impl Fn(u8) -> bool) -> Match {
    one(src, out, &pred).and_then(|| many0(src, out, &pred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    fn digit(b: u8) -> bool {
        b.is_ascii_digit()
    }

    #[test]
    fn test_one_and_many() {
        let mut src = SliceSource::new(b"123a");
        let mut out = Lexeme::new();
        assert_eq!(one(&mut src, &mut out, |b| b == b'-'), Match::Skipped);
        assert_eq!(many1(&mut src, &mut out, digit), Match::Matched);
        assert_eq!(out.as_slice(), b"123");
        assert_eq!(many1(&mut src, &mut out, digit), Match::Skipped);
        assert_eq!(many0(&mut src, &mut out, digit), Match::Matched);
        assert_eq!(src.position(), 3);
    }

    #[test]
    fn test_sequence_failure_after_consumption() {
        let mut src = SliceSource::new(b".e");
        let mut out = Lexeme::new();
        let frac = one(&mut src, &mut out, |b| b == b'.')
            .and_then(|| many1(&mut src, &mut out, digit));
        assert_eq!(frac, Match::Failed);
        assert_eq!(out.as_slice(), b".");
    }

    #[test]
    fn test_optional_never_skips() {
        let mut src = SliceSource::new(b"5");
        let mut out = Lexeme::new();
        let exp = optional(&mut src, &mut out, |b| b == b'+')
            .and_then(|| many1(&mut src, &mut out, digit));
        assert_eq!(exp, Match::Matched);
        assert_eq!(out.as_slice(), b"5");
    }
}

//! Pull-based byte sources consumed by the parser

use std::io::{self, Read};

use smallvec::SmallVec;

/// Read buffer size for [`ReaderSource`]
const READ_BUFFER: usize = 8 * 1024;

/// Cursor over a byte stream
pub trait ByteSource {
    /// Consume and return the next byte
    fn next(&mut self) -> Option<u8>;

    /// Return the next byte without consuming it
    fn peek(&mut self) -> Option<u8>;

    /// Check whether the stream is exhausted
    fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Bytes consumed so far
    fn position(&self) -> usize;

    /// Consume up to `n` bytes
    ///
    /// Returns fewer than `n` bytes only when the stream ends.
    fn take(&mut self, n: usize) -> SmallVec<[u8; 8]> {
        let mut out = SmallVec::new();
        while out.len() < n {
            match self.next() {
                Some(b) => out.push(b),
                None => break,
            }
        }
        out
    }
}

/// Source over an in-memory byte range
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source positioned at the start of `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn next(&mut self) -> Option<u8> {
        let b = *self.input.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    #[inline]
    fn peek(&mut self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn is_eof(&mut self) -> bool {
        self.pos >= self.input.len()
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> SmallVec<[u8; 8]> {
        let rest = self.remaining();
        let taken = &rest[..n.min(rest.len())];
        self.pos += taken.len();
        SmallVec::from_slice(taken)
    }
}

/// Buffered source over any [`Read`] implementation
///
/// A read error ends the stream. The error is kept and can be retrieved with
/// [`ReaderSource::take_error`] to tell it apart from a truncated document.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    consumed: usize,
    done: bool,
    error: Option<io::Error>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; READ_BUFFER].into_boxed_slice(),
            start: 0,
            end: 0,
            consumed: 0,
            done: false,
            error: None,
        }
    }

    /// I/O error that ended the stream, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Unwrap the inner reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> bool {
        if self.start < self.end {
            return true;
        }
        while !self.done {
            match self.reader.read(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                    return true;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.error = Some(err);
                    self.done = true;
                }
            }
        }
        false
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next(&mut self) -> Option<u8> {
        if !self.fill() {
            return None;
        }
        let b = self.buf[self.start];
        self.start += 1;
        self.consumed += 1;
        Some(b)
    }

    fn peek(&mut self) -> Option<u8> {
        if !self.fill() {
            return None;
        }
        Some(self.buf[self.start])
    }

    fn position(&self) -> usize {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Trickle<'a> {
        data: &'a [u8],
        interrupted: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::ErrorKind::Interrupted.into());
            }
            let Some((&first, rest)) = self.data.split_first() else {
                return Ok(0);
            };
            buf[0] = first;
            self.data = rest;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_slice_source() {
        let mut src = SliceSource::new(b"abc");
        assert_eq!(src.peek(), Some(b'a'));
        assert_eq!(src.next(), Some(b'a'));
        assert_eq!(src.position(), 1);
        assert_eq!(src.take(5).as_slice(), b"bc");
        assert!(src.is_eof());
        assert_eq!(src.next(), None);
    }

    #[test]
    fn test_reader_source_across_reads() {
        let mut src = ReaderSource::new(Trickle {
            data: b"null",
            interrupted: false,
        });
        assert_eq!(src.take(4).as_slice(), b"null");
        assert_eq!(src.position(), 4);
        assert!(src.is_eof());
        assert!(src.take_error().is_none());
    }

    #[test]
    fn test_reader_error_ends_stream() {
        let mut src = ReaderSource::new(Broken);
        assert_eq!(src.next(), None);
        assert!(src.is_eof());
        let err = src.take_error().unwrap();
        assert_eq!(err.to_string(), "device gone");
    }
}

//! Unicode codec used by the string sub-parser
//!
//! UTF-8 encoding of single codepoints and UTF-16 surrogate-pair handling for
//! `\uXXXX` escapes.

pub mod utf16;
pub mod utf8;

pub use utf16::{decode_pair, encode_pair, is_high_surrogate, is_low_surrogate, is_surrogate};
pub use utf8::{MAX_CODEPOINT, UTF8_MAX, encode_utf8, encoded_len, is_valid_codepoint};

/// Value of a single ASCII hex digit
pub fn hex_value(byte: u8) -> Option<u16> {
    match byte {
        b'0'..=b'9' => Some(u16::from(byte - b'0')),
        b'a'..=b'f' => Some(u16::from(byte - b'a' + 10)),
        b'A'..=b'F' => Some(u16::from(byte - b'A' + 10)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_value() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }
}

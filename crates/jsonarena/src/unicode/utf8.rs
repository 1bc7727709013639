//! UTF-8 encoding of a single codepoint

/// Largest valid Unicode codepoint
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Maximum number of bytes in one UTF-8 encoded codepoint
pub const UTF8_MAX: usize = 4;

const RUNE1_MAX: u32 = (1 << 7) - 1;
const RUNE2_MAX: u32 = (1 << 11) - 1;
const RUNE3_MAX: u32 = (1 << 16) - 1;

const TX: u8 = 0b1000_0000;
const T2: u8 = 0b1100_0000;
const T3: u8 = 0b1110_0000;
const T4: u8 = 0b1111_0000;
const MASKX: u32 = 0b0011_1111;

/// Reports whether `cp` is a Unicode scalar value (in range, not a surrogate)
pub fn is_valid_codepoint(cp: u32) -> bool {
    cp <= MAX_CODEPOINT && !super::is_surrogate(cp)
}

/// Number of bytes `cp` occupies when UTF-8 encoded
pub fn encoded_len(cp: u32) -> usize {
    if cp <= RUNE1_MAX {
        1
    } else if cp <= RUNE2_MAX {
        2
    } else if cp <= RUNE3_MAX {
        3
    } else {
        4
    }
}

/// Write the UTF-8 encoding of `cp` into `buf`, returning the byte count
///
/// Returns `None` for surrogates and values above [`MAX_CODEPOINT`].
pub fn encode_utf8(cp: u32, buf: &mut [u8; UTF8_MAX]) -> Option<usize> {
    if !is_valid_codepoint(cp) {
        return None;
    }

    let n = encoded_len(cp);
    match n {
        1 => buf[0] = cp as u8,
        2 => {
            buf[0] = T2 | (cp >> 6) as u8;
            buf[1] = TX | (cp & MASKX) as u8;
        }
        3 => {
            buf[0] = T3 | (cp >> 12) as u8;
            buf[1] = TX | ((cp >> 6) & MASKX) as u8;
            buf[2] = TX | (cp & MASKX) as u8;
        }
        _ => {
            buf[0] = T4 | (cp >> 18) as u8;
            buf[1] = TX | ((cp >> 12) & MASKX) as u8;
            buf[2] = TX | ((cp >> 6) & MASKX) as u8;
            buf[3] = TX | (cp & MASKX) as u8;
        }
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(cp: u32) -> Vec<u8> {
        let mut buf = [0u8; UTF8_MAX];
        let n = encode_utf8(cp, &mut buf).unwrap();
        buf[..n].to_vec()
    }

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encode(0x00), [0x00]);
        assert_eq!(encode(0x41), [0x41]);
        assert_eq!(encode(0x7F), [0x7F]);
        assert_eq!(encode(0x80), [0xC2, 0x80]);
        assert_eq!(encode(0x7FF), [0xDF, 0xBF]);
        assert_eq!(encode(0x800), [0xE0, 0xA0, 0x80]);
        assert_eq!(encode(0x1234), [0xE1, 0x88, 0xB4]);
        assert_eq!(encode(0xFFFF), [0xEF, 0xBF, 0xBF]);
        assert_eq!(encode(0x10000), [0xF0, 0x90, 0x80, 0x80]);
        assert_eq!(encode(MAX_CODEPOINT), [0xF4, 0x8F, 0xBF, 0xBF]);
    }

    #[test]
    fn test_encode_matches_std() {
        for cp in [0x24, 0xA2, 0x939, 0x20AC, 0xD55C, 0x10348, 0x1F600] {
            let ch = char::from_u32(cp).unwrap();
            let mut expected = [0u8; 4];
            assert_eq!(encode(cp), ch.encode_utf8(&mut expected).as_bytes());
        }
    }

    #[test]
    fn test_rejects_surrogates_and_out_of_range() {
        let mut buf = [0u8; UTF8_MAX];
        assert_eq!(encode_utf8(0xD800, &mut buf), None);
        assert_eq!(encode_utf8(0xDFFF, &mut buf), None);
        assert_eq!(encode_utf8(MAX_CODEPOINT + 1, &mut buf), None);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0x7F), 1);
        assert_eq!(encoded_len(0x80), 2);
        assert_eq!(encoded_len(0xFFFF), 3);
        assert_eq!(encoded_len(0x10000), 4);
    }
}

//! UTF-16 surrogate pairs
//!
//! 0xD800..0xDC00 encodes the high 10 bits of a pair, 0xDC00..0xE000 the low
//! 10 bits. The codepoint is those 20 bits plus 0x10000.

const SURR1: u32 = 0xD800;
const SURR2: u32 = 0xDC00;
const SURR3: u32 = 0xE000;
const SURR_SELF: u32 = 0x1_0000;

/// Reports whether `cp` lies in the surrogate range U+D800..=U+DFFF
pub fn is_surrogate(cp: u32) -> bool {
    (SURR1..SURR3).contains(&cp)
}

/// Reports whether `cp` is a high (leading) surrogate
pub fn is_high_surrogate(cp: u32) -> bool {
    (SURR1..SURR2).contains(&cp)
}

/// Reports whether `cp` is a low (trailing) surrogate
pub fn is_low_surrogate(cp: u32) -> bool {
    (SURR2..SURR3).contains(&cp)
}

/// Combine a high and a low surrogate into one codepoint
///
/// Returns `None` if the two units do not form a valid pair.
pub fn decode_pair(high: u32, low: u32) -> Option<u32> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    Some((((high - SURR1) << 10) | (low - SURR2)) + SURR_SELF)
}

/// Split a supplementary-plane codepoint into its surrogate pair
///
/// Returns `None` for codepoints that do not need a pair.
pub fn encode_pair(cp: u32) -> Option<(u16, u16)> {
    if !(SURR_SELF..=super::MAX_CODEPOINT).contains(&cp) {
        return None;
    }
    let v = cp - SURR_SELF;
    Some(((SURR1 + ((v >> 10) & 0x3FF)) as u16, (SURR2 + (v & 0x3FF)) as u16))
}

//! String-to-number conversion with range classification
//!
//! Conversions follow the C library contract: a literal out of range still
//! yields a value (the clamped sentinel) together with an
//! [`ConvertState::Overflow`] or [`ConvertState::Underflow`] outcome.

use std::num::IntErrorKind;

use crate::value::JsonNumber;

/// Range outcome of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertState {
    /// Value is exact or correctly rounded
    Ok,
    /// Magnitude too large, value is clamped
    Overflow,
    /// Magnitude below the smallest normal double
    Underflow,
}

/// Converted value and its range outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted<T> {
    /// Result, or the clamped sentinel on a range error
    pub value: T,
    /// Range outcome
    pub state: ConvertState,
}

impl<T> Converted<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            state: ConvertState::Ok,
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            state: self.state,
        }
    }
}

/// Convert an integer literal
///
/// Returns `None` when the text is not an optionally signed run of digits.
/// Out-of-range literals clamp to `i64::MAX` or `i64::MIN`.
pub fn to_i64(text: &str) -> Option<Converted<i64>> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match text.parse::<i64>() {
        Ok(value) => Some(Converted::ok(value)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(Converted {
                value: i64::MAX,
                state: ConvertState::Overflow,
            }),
            IntErrorKind::NegOverflow => Some(Converted {
                value: i64::MIN,
                state: ConvertState::Overflow,
            }),
            _ => None,
        },
    }
}

/// Convert a decimal literal with optional fraction and exponent
///
/// Overflow yields a signed infinity. Underflow is reported when a literal
/// with a nonzero mantissa rounds to zero or to a subnormal.
pub fn to_f64(text: &str) -> Option<Converted<f64>> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit())
        || !unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    let value: f64 = text.parse().ok()?;

    let state = if value.is_infinite() {
        ConvertState::Overflow
    } else if value == 0.0 {
        if has_nonzero_mantissa(unsigned) {
            ConvertState::Underflow
        } else {
            ConvertState::Ok
        }
    } else if value.is_subnormal() {
        ConvertState::Underflow
    } else {
        ConvertState::Ok
    };
    Some(Converted { value, state })
}

/// Convert a JSON number literal, choosing the variant from its shape
///
/// Literals containing `.`, `e` or `E` become doubles, all others integers.
pub fn convert(text: &str) -> Option<Converted<JsonNumber>> {
    if text.contains(['.', 'e', 'E']) {
        to_f64(text).map(|c| c.map(JsonNumber::Double))
    } else {
        to_i64(text).map(|c| c.map(JsonNumber::Int))
    }
}

fn has_nonzero_mantissa(unsigned: &str) -> bool {
    unsigned
        .split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(to_i64("0"), Some(Converted::ok(0)));
        assert_eq!(to_i64("-0"), Some(Converted::ok(0)));
        assert_eq!(to_i64("123"), Some(Converted::ok(123)));
        assert_eq!(to_i64("-9223372036854775808").map(|c| c.value), Some(i64::MIN));
        assert_eq!(to_i64("abc"), None);
        assert_eq!(to_i64("-"), None);
        assert_eq!(to_i64("+1"), None);
    }

    #[test]
    fn test_integer_overflow_clamps() {
        let pos = to_i64("9223372036854775808").unwrap();
        assert_eq!(pos.value, i64::MAX);
        assert_eq!(pos.state, ConvertState::Overflow);

        let neg = to_i64("-9223372036854775809").unwrap();
        assert_eq!(neg.value, i64::MIN);
        assert_eq!(neg.state, ConvertState::Overflow);
    }

    #[test]
    fn test_doubles() {
        assert_eq!(to_f64("-1.23E3").unwrap().value, -1230.0);
        assert_eq!(to_f64("1e3").unwrap().value, 1000.0);
        assert_eq!(to_f64("0.0").unwrap().state, ConvertState::Ok);
        assert_eq!(to_f64("0e-999").unwrap().state, ConvertState::Ok);
        assert_eq!(to_f64("inf"), None);
        assert_eq!(to_f64("NaN"), None);
    }

    #[test]
    fn test_double_overflow() {
        let c = to_f64("1e1200").unwrap();
        assert_eq!(c.state, ConvertState::Overflow);
        assert_eq!(c.value, f64::INFINITY);
        assert_eq!(to_f64("-1e400").unwrap().value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_double_underflow() {
        assert_eq!(to_f64("1e-400").unwrap().state, ConvertState::Underflow);
        assert_eq!(to_f64("4e-320").unwrap().state, ConvertState::Underflow);
        assert_eq!(to_f64("2.2250738585072014e-308").unwrap().state, ConvertState::Ok);
    }

    #[test]
    fn test_convert_picks_variant() {
        assert_eq!(convert("42").unwrap().value, JsonNumber::Int(42));
        assert_eq!(convert("1e3").unwrap().value, JsonNumber::Double(1000.0));
        assert_eq!(convert("2.5").unwrap().value, JsonNumber::Double(2.5));
        assert_eq!(convert("x"), None);
    }
}

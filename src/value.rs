//! Lexical conversions between attribute values and Rust types.
//!
//! Attribute values are always text. The typed accessors on
//! [`Attribute`](crate::Attribute) go through the strict rules here:
//!
//! | Type  | Accepted text |
//! |-------|---------------|
//! | bool  | `true` / `false`, any case |
//! | int   | `[-+]?[0-9]+` within `i64` |
//! | float | `[-+]?[0-9]+(\.[0-9]+([eE][-+]?[0-9]+)?)?` |
//! | bytes | `Base64|...|` with the standard alphabet, no padding |

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_PREFIX: &str = "Base64|";

/// Parses `true`/`false` ignoring case.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(['-', '+']).unwrap_or(text)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a decimal integer without whitespace, separators or exponent.
///
/// ```rust
/// use sml::value::parse_int;
///
/// assert_eq!(parse_int("+42"), Some(42));
/// assert_eq!(parse_int("-0"), Some(0));
/// assert_eq!(parse_int("1.0"), None);
/// assert_eq!(parse_int("99999999999999999999"), None);
/// ```
#[must_use]
pub fn parse_int(text: &str) -> Option<i64> {
    if !is_digits(strip_sign(text)) {
        return None;
    }
    text.parse().ok()
}

/// Parses a float. A fraction is required before an exponent may appear.
///
/// ```rust
/// use sml::value::parse_float;
///
/// assert_eq!(parse_float("1.5e3"), Some(1500.0));
/// assert_eq!(parse_float("-7"), Some(-7.0));
/// assert_eq!(parse_float("1e3"), None);
/// assert_eq!(parse_float(".5"), None);
/// assert_eq!(parse_float("NaN"), None);
/// ```
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    let unsigned = strip_sign(text);
    let (integer, rest) = match unsigned.split_once('.') {
        Some((integer, rest)) => (integer, Some(rest)),
        None => (unsigned, None),
    };
    if !is_digits(integer) {
        return None;
    }
    if let Some(rest) = rest {
        let (fraction, exponent) = match rest.split_once(['e', 'E']) {
            Some((fraction, exponent)) => (fraction, Some(exponent)),
            None => (rest, None),
        };
        if !is_digits(fraction) {
            return None;
        }
        if let Some(exponent) = exponent {
            if !is_digits(strip_sign(exponent)) {
                return None;
            }
        }
    }
    text.parse().ok()
}

/// Formats a finite float in plain decimal notation; `-0.0` becomes `0`.
#[must_use]
pub fn format_float(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    Some(value.to_string())
}

/// Encodes bytes as reliable base64: `Base64|` + unpadded standard base64 + `|`.
///
/// ```rust
/// use sml::value::{encode_base64, decode_base64};
///
/// assert_eq!(encode_base64(b"ManM"), "Base64|TWFuTQ|");
/// assert_eq!(decode_base64("Base64||"), Some(vec![]));
/// ```
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(BASE64_PREFIX.len() + bytes.len() * 4 / 3 + 4);
    out.push_str(BASE64_PREFIX);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        out.push(ALPHABET[((b0 & 0x03) << 4 | (b1 >> 4)) as usize] as char);
        if chunk.len() > 1 {
            out.push(ALPHABET[((b1 & 0x0f) << 2 | (b2 >> 6)) as usize] as char);
        }
        if chunk.len() > 2 {
            out.push(ALPHABET[(b2 & 0x3f) as usize] as char);
        }
    }
    out.push('|');
    out
}

fn sextet(c: u8) -> Option<u32> {
    let value = match c {
        b'A'..=b'Z' => c - b'A',
        b'a'..=b'z' => c - b'a' + 26,
        b'0'..=b'9' => c - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u32::from(value))
}

/// Decodes reliable base64. Padding is tolerated but not required.
#[must_use]
pub fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let body = text.strip_prefix(BASE64_PREFIX)?.strip_suffix('|')?;
    let body = body.trim_end_matches('=').as_bytes();
    if body.len() % 4 == 1 {
        return None;
    }
    let mut out = Vec::with_capacity(body.len() * 3 / 4);
    for chunk in body.chunks(4) {
        let mut acc = 0u32;
        for (i, &c) in chunk.iter().enumerate() {
            acc |= sextet(c)? << (18 - 6 * i);
        }
        let [_, b0, b1, b2] = acc.to_be_bytes();
        out.push(b0);
        if chunk.len() > 2 {
            out.push(b1);
        }
        if chunk.len() > 3 {
            out.push(b2);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn test_float_lexical_rules() {
        assert_eq!(parse_float("10.5E-1"), Some(1.05));
        assert_eq!(parse_float("+3.0"), Some(3.0));
        for bad in ["", "-", "10.", "1.e5", "1.0e", "1.0e+", " 1", "inf", "0x10"] {
            assert_eq!(parse_float(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0).as_deref(), Some("1"));
        assert_eq!(format_float(-0.0).as_deref(), Some("0"));
        assert_eq!(format_float(0.25).as_deref(), Some("0.25"));
        assert_eq!(format_float(f64::NAN), None);
        assert_eq!(format_float(f64::NEG_INFINITY), None);
        let big = format_float(1e21).unwrap();
        assert_eq!(parse_float(&big), Some(1e21));
    }

    #[test]
    fn test_base64() {
        let cases: [(&[u8], &str); 5] = [
            (b"", "Base64||"),
            (b"M", "Base64|TQ|"),
            (b"Ma", "Base64|TWE|"),
            (b"Man", "Base64|TWFu|"),
            (b"ManM", "Base64|TWFuTQ|"),
        ];
        for (bytes, text) in cases {
            assert_eq!(encode_base64(bytes), text);
            assert_eq!(decode_base64(text).as_deref(), Some(bytes));
        }
        assert_eq!(decode_base64("Base64|TQ==|"), Some(b"M".to_vec()));
        assert_eq!(decode_base64("TWFu"), None);
        assert_eq!(decode_base64("Base64|T|"), None);
        assert_eq!(decode_base64("Base64|T*E|"), None);
    }
}

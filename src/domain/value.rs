//! Convenience parsers for logical values
//!
//! Shell-variable files spell booleans and numbers as plain strings;
//! these helpers interpret them the way the surrounding tooling expects.

use super::name::is_shell_space;

/// Parses a boolean value.
///
/// `yes`, `true`, `t`, `y`, `1` and `no`, `false`, `f`, `n`, `0` are
/// recognized, case-insensitively. Anything else is `None`.
pub fn parse_boolean(value: &str) -> Option<bool> {
    const TRUTHY: [&str; 5] = ["yes", "true", "t", "y", "1"];
    const FALSY: [&str; 5] = ["no", "false", "f", "n", "0"];

    if TRUTHY.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|f| value.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

/// Parses a bounded integer.
///
/// `base` 0 auto-detects: `0x`/`0X` prefix is hexadecimal, a leading `0`
/// is octal, otherwise decimal. Surrounding whitespace is ignored.
/// Values outside `min..=max`, or not a number at all, are `None`.
pub fn parse_i64(value: &str, base: u32, min: i64, max: i64) -> Option<i64> {
    let s = value.trim_matches(|c: char| c.is_ascii() && is_shell_space(c as u8));
    if s.is_empty() {
        return None;
    }

    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (base, digits) = match base {
        0 => {
            if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                (16, rest)
            } else if digits.len() > 1 && digits.starts_with('0') {
                (8, &digits[1..])
            } else {
                (10, digits)
            }
        }
        b => (b, digits),
    };

    if digits.is_empty() {
        return None;
    }

    let n = i128::from_str_radix(digits, base).ok()?;
    let n = if negative { -n } else { n };
    if n < i128::from(min) || n > i128::from(max) {
        return None;
    }
    Some(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_truthy_values() {
        for v in ["yes", "YES", "Yes", "true", "TRUE", "t", "y", "1"] {
            assert_eq!(parse_boolean(v), Some(true), "value {v:?}");
        }
    }

    #[test]
    fn boolean_falsy_values() {
        for v in ["no", "NO", "false", "FALSE", "f", "n", "0"] {
            assert_eq!(parse_boolean(v), Some(false), "value {v:?}");
        }
    }

    #[test]
    fn boolean_unrecognized_values() {
        for v in ["maybe", "", "2", "yess", "on", "off"] {
            assert_eq!(parse_boolean(v), None, "value {v:?}");
        }
    }

    #[test]
    fn integer_decimal() {
        assert_eq!(parse_i64("42", 10, 0, 100), Some(42));
        assert_eq!(parse_i64("-7", 10, -10, 10), Some(-7));
        assert_eq!(parse_i64("+7", 10, -10, 10), Some(7));
        assert_eq!(parse_i64(" 1500 ", 10, 0, 9000), Some(1500));
    }

    #[test]
    fn integer_range_enforced() {
        assert_eq!(parse_i64("101", 10, 0, 100), None);
        assert_eq!(parse_i64("-1", 10, 0, 100), None);
        assert_eq!(parse_i64("9223372036854775808", 10, i64::MIN, i64::MAX), None);
    }

    #[test]
    fn integer_base_autodetect() {
        assert_eq!(parse_i64("0x1f", 0, 0, 1000), Some(31));
        assert_eq!(parse_i64("0X1F", 0, 0, 1000), Some(31));
        assert_eq!(parse_i64("010", 0, 0, 1000), Some(8));
        assert_eq!(parse_i64("10", 0, 0, 1000), Some(10));
        assert_eq!(parse_i64("0", 0, 0, 1000), Some(0));
        assert_eq!(parse_i64("-0x10", 0, -100, 100), Some(-16));
    }

    #[test]
    fn integer_garbage_rejected() {
        assert_eq!(parse_i64("", 10, 0, 100), None);
        assert_eq!(parse_i64("12a", 10, 0, 100), None);
        assert_eq!(parse_i64("0x", 0, 0, 100), None);
        assert_eq!(parse_i64("-", 10, -10, 10), None);
        assert_eq!(parse_i64("1 2", 10, 0, 100), None);
    }
}

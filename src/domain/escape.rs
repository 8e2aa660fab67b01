//! Escaping of logical values into raw shell form
//!
//! Produces the text written after `KEY=`. Three forms, picked per value:
//!
//! - unchanged, when no character needs quoting (zero-copy)
//! - double-quoted, with `" \ $ \`` backslash-escaped
//! - ANSI-C `$'...'`, the only form that can carry control bytes such as
//!   embedded newlines (line continuation is not supported)

use std::borrow::Cow;

/// Always backslash-escaped inside generated double quotes.
fn req_escape(b: u8) -> bool {
    matches!(b, b'"' | b'\\' | b'$' | b'`')
}

/// Forces the whole value into double quotes even though the character
/// itself is written bare.
fn req_quotes(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\'' | b'~' | b'\t' | b'|' | b'&' | b';' | b'(' | b')' | b'<' | b'>'
    )
}

/// Escapes a logical value into its raw form.
///
/// Returns the value unchanged (borrowed) when it needs no quoting.
pub fn escape(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let mut escapes = 0;
    let mut requires_quotes = false;

    for &b in bytes {
        if req_escape(b) {
            escapes += 1;
        } else if req_quotes(b) {
            requires_quotes = true;
        } else if b < 0x20 {
            // Control characters only survive in ANSI-C quoting.
            return Cow::Owned(escape_ansi_c(value));
        }
    }

    if escapes == 0 && !requires_quotes {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + escapes + 2);
    out.push('"');
    for ch in value.chars() {
        if ch.is_ascii() && req_escape(ch as u8) {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Encodes a value as `$'...'`: named escapes for the common control
/// characters, octal `\NNN` for other control and high bytes.
fn escape_ansi_c(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    out.push_str("$'");
    for &b in value.as_bytes() {
        match b {
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0b => out.push_str("\\v"),
            b'\\' | b'"' | b'\'' => {
                out.push('\\');
                out.push(b as char);
            }
            _ if b < 0x20 || b >= 0x7f => {
                out.push('\\');
                out.push(char::from(b'0' + ((b >> 6) & 0o7)));
                out.push(char::from(b'0' + ((b >> 3) & 0o7)));
                out.push(char::from(b'0' + (b & 0o7)));
            }
            _ => out.push(b as char),
        }
    }
    out.push('\'');
    out
}

//! Unescaping of raw shell values
//!
//! Takes the text after `KEY=` and produces the logical value, handling
//! the quoting subset that assignment-only files use: backslash escapes,
//! single quotes, double quotes, and ANSI-C `$'...'` quoting. Shell
//! expansion and control constructs are rejected; a value the shell would
//! split into multiple words is rejected too.
//!
//! The raw value must not contain a newline. Line continuation is not
//! supported and reads as a parse error.

use std::borrow::Cow;

use thiserror::Error;

use super::name::is_shell_space;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnescapeError {
    #[error("unquoted text after whitespace")]
    TrailingText,

    #[error("line continuation is not supported")]
    LineContinuation,

    #[error("unterminated single quote")]
    UnterminatedSingleQuote,

    #[error("unterminated double quote")]
    UnterminatedDoubleQuote,

    #[error("unterminated $'...' quote")]
    UnterminatedAnsiQuote,

    #[error("shell expansion via '{0}' is not supported")]
    UnsupportedExpansion(char),

    #[error("unquoted shell metacharacter '{0}'")]
    UnsupportedMetacharacter(char),

    #[error("escape sequences do not form valid UTF-8")]
    NotUtf8,

    #[error("invalid Unicode code point {0:#x} in escape")]
    InvalidCodepoint(u64),
}

/// Unescapes a raw value into its logical string.
///
/// Returns a borrowed slice of the input when no quoting construct was
/// seen; an owned buffer is only allocated once one is. An empty or
/// whitespace/comment-only raw value yields the empty string.
pub fn unescape(raw: &str) -> Result<Cow<'_, str>, UnescapeError> {
    let bytes = raw.as_bytes();
    let mut buf: Option<Vec<u8>> = None;
    let mut looks_like_old: Option<bool> = None;
    let mut i = 0;

    loop {
        let Some(&b) = bytes.get(i) else {
            break;
        };

        if is_shell_space(b) || b == b';' {
            // Unquoted whitespace ends the value. It is only valid if the
            // rest of the input is blank or a #-comment, with at most one
            // semicolon mixed in:
            //   FOO=a ;        ok
            //   FOO=b #c       ok
            //   FOO=a b        error (word splitting)
            let mut has_semicolon = b == b';';
            let mut j = i + 1;
            while let Some(&c) = bytes.get(j) {
                if is_shell_space(c) {
                    j += 1;
                } else if c == b';' && !has_semicolon {
                    has_semicolon = true;
                    j += 1;
                } else {
                    break;
                }
            }
            match bytes.get(j) {
                None | Some(&b'#') => break,
                _ => return Err(UnescapeError::TrailingText),
            }
        }

        if b == b'\\' {
            let out = force(&mut buf, bytes, i);
            i += 1;
            let Some(&e) = bytes.get(i) else {
                return Err(UnescapeError::LineContinuation);
            };
            out.push(e);
            i += 1;
            continue;
        }

        if b == b'\'' {
            let out = force(&mut buf, bytes, i);
            i += 1;
            let Some(n) = bytes[i..].iter().position(|&c| c == b'\'') else {
                return Err(UnescapeError::UnterminatedSingleQuote);
            };
            out.extend_from_slice(&bytes[i..i + n]);
            i += n + 1;
            continue;
        }

        if b == b'"' {
            let out = force(&mut buf, bytes, i);
            i += 1;
            loop {
                match bytes.get(i) {
                    None => return Err(UnescapeError::UnterminatedDoubleQuote),
                    Some(&b'"') => {
                        i += 1;
                        break;
                    }
                    Some(&(c @ (b'`' | b'$'))) => {
                        return Err(UnescapeError::UnsupportedExpansion(c as char));
                    }
                    Some(&b'\\') => {
                        i += 1;
                        let Some(&e) = bytes.get(i) else {
                            return Err(UnescapeError::LineContinuation);
                        };
                        match e {
                            b'$' | b'`' | b'"' | b'\\' => {}
                            b'\'' | b'~' => {
                                // The shell keeps the backslash here, but an
                                // older generation of the escaper emitted
                                // `\'` and `\~` inside double quotes. Only
                                // when the whole raw value has that exact
                                // shape do we read it the old way.
                                let old = *looks_like_old
                                    .get_or_insert_with(|| looks_like_old_escaped(bytes));
                                if !old {
                                    out.push(b'\\');
                                }
                            }
                            _ => out.push(b'\\'),
                        }
                        out.push(e);
                        i += 1;
                    }
                    Some(&c) => {
                        out.push(c);
                        i += 1;
                    }
                }
            }
            continue;
        }

        if b == b'$' && bytes.get(i + 1) == Some(&b'\'') {
            unescape_ansi_c(force(&mut buf, bytes, i), bytes, &mut i)?;
            continue;
        }

        if b == b'`' {
            return Err(UnescapeError::UnsupportedExpansion('`'));
        }

        if matches!(b, b'|' | b'&' | b'(' | b')' | b'<' | b'>') {
            // Metacharacters need quoting; ';' is handled with whitespace.
            return Err(UnescapeError::UnsupportedMetacharacter(b as char));
        }

        // An unquoted regular character.
        if let Some(out) = buf.as_mut() {
            out.push(b);
        }
        i += 1;
    }

    if i == 0 {
        debug_assert!(buf.is_none());
        return Ok(Cow::Borrowed(""));
    }

    if let Some(out) = buf {
        // A leading NUL truncates the value to empty, like the shell's
        // C-string view of it.
        if out.is_empty() || out[0] == 0 {
            return Ok(Cow::Borrowed(""));
        }
        return String::from_utf8(out)
            .map(Cow::Owned)
            .map_err(|_| UnescapeError::NotUtf8);
    }

    // Fully literal: borrow the consumed prefix. `i` only ever stops on
    // ASCII, so it is a char boundary.
    Ok(Cow::Borrowed(&raw[..i]))
}

/// Decodes one `$'...'` section starting at `*i` (which points at the
/// `$`). On success `*i` points past the closing quote.
fn unescape_ansi_c(
    out: &mut Vec<u8>,
    bytes: &[u8],
    i: &mut usize,
) -> Result<(), UnescapeError> {
    *i += 2;
    loop {
        match bytes.get(*i) {
            None => return Err(UnescapeError::UnterminatedAnsiQuote),
            Some(&b'\'') => {
                *i += 1;
                return Ok(());
            }
            Some(&b'\\') => {
                *i += 1;
                let Some(&e) = bytes.get(*i) else {
                    return Err(UnescapeError::LineContinuation);
                };
                match e {
                    b'a' => push1(out, 0x07, i),
                    b'b' => push1(out, 0x08, i),
                    b'e' | b'E' => push1(out, 0x1b, i),
                    b'f' => push1(out, 0x0c, i),
                    b'n' => push1(out, b'\n', i),
                    b'r' => push1(out, b'\r', i),
                    b't' => push1(out, b'\t', i),
                    b'v' => push1(out, 0x0b, i),
                    b'?' => push1(out, b'?', i),
                    b'"' => push1(out, b'"', i),
                    b'\\' => push1(out, b'\\', i),
                    b'\'' => push1(out, b'\'', i),
                    b'0'..=b'7' => {
                        let mut v = u32::from(e - b'0');
                        *i += 1;
                        for _ in 0..2 {
                            match bytes.get(*i) {
                                Some(&(d @ b'0'..=b'7')) => {
                                    v = v * 8 + u32::from(d - b'0');
                                    *i += 1;
                                }
                                _ => break,
                            }
                        }
                        // Like bash, overflow is cut to a byte: \772 -> 0xfa.
                        out.push(v as u8);
                    }
                    b'x' | b'u' | b'U' => {
                        let max_digits = match e {
                            b'x' => 2,
                            b'u' => 4,
                            _ => 8,
                        };
                        *i += 1;
                        match bytes.get(*i).copied().and_then(hex_val) {
                            None => {
                                // No hex digit after the escape letter:
                                // keep it literal, not an error.
                                out.push(b'\\');
                                out.push(e);
                            }
                            Some(first) => {
                                let mut v = u64::from(first);
                                *i += 1;
                                for _ in 1..max_digits {
                                    match bytes.get(*i).copied().and_then(hex_val) {
                                        Some(d) => {
                                            v = v * 16 + u64::from(d);
                                            *i += 1;
                                        }
                                        None => break,
                                    }
                                }
                                if e == b'x' {
                                    out.push(v as u8);
                                } else {
                                    let ch = u32::try_from(v)
                                        .ok()
                                        .and_then(char::from_u32)
                                        .ok_or(UnescapeError::InvalidCodepoint(v))?;
                                    let mut enc = [0u8; 4];
                                    out.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
                                }
                            }
                        }
                    }
                    _ => {
                        out.push(b'\\');
                        push1(out, e, i);
                    }
                }
            }
            Some(&c) => push1(out, c, i),
        }
    }
}

fn push1(out: &mut Vec<u8>, b: u8, i: &mut usize) {
    out.push(b);
    *i += 1;
}

/// Lazily switches from the zero-copy scan to an owned buffer, seeding it
/// with the literal prefix consumed so far.
fn force<'b>(buf: &'b mut Option<Vec<u8>>, bytes: &[u8], upto: usize) -> &'b mut Vec<u8> {
    buf.get_or_insert_with(|| {
        let mut v = Vec::with_capacity(bytes.len() + 3);
        v.extend_from_slice(&bytes[..upto]);
        v
    })
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// The escape set the old escaper used inside double quotes.
fn is_old_escape(b: u8) -> bool {
    matches!(b, b'"' | b'\\' | b'\'' | b'$' | b'`' | b'~')
}

/// Whether the whole raw value has the exact shape the old escaper
/// produced: one double-quoted string where every special character is
/// backslash-escaped and the closing quote ends the input.
fn looks_like_old_escaped(raw: &[u8]) -> bool {
    if raw.first() != Some(&b'"') {
        return false;
    }
    let mut k = 1;
    loop {
        let Some(&b) = raw.get(k) else {
            return false;
        };
        if !is_old_escape(b) {
            k += 1;
            continue;
        }
        match b {
            b'"' => return k + 1 == raw.len(),
            b'\\' => {
                k += 1;
                match raw.get(k) {
                    Some(&c) if is_old_escape(c) => k += 1,
                    _ => return false,
                }
            }
            _ => return false,
        }
    }
}

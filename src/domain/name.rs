//! Shell variable name grammar
//!
//! A valid name matches `[A-Za-z_][A-Za-z0-9_]*`, the identifier grammar
//! shells use for variable assignments. Every key passed to the document
//! API must satisfy it.

/// Returns true if `s` is a valid shell variable name.
pub fn is_name(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != b'_' {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// ASCII whitespace as shells see it (space, tab, and the C0 spacing
/// controls). Note this includes vertical tab, unlike
/// `u8::is_ascii_whitespace`.
pub(crate) fn is_shell_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

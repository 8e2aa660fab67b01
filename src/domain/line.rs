//! Line model for shell-variable files
//!
//! Every physical line is one of:
//!
//! 1. structural — not a `KEY=` assignment (comment, blank, or anything
//!    unparsable). The whole original text is kept and written back as-is.
//! 2. an assignment — `key_with_prefix` holds the key with its original
//!    leading whitespace, `text` the raw value after `=`.
//! 3. a deleted assignment — like 2, but `text` is cleared. The line
//!    keeps its place in the file until the next write drops it.

use super::escape::escape;
use super::name::{is_name, is_shell_space};

/// One physical line of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Raw value after `=` for assignments, the whole line for structural
    /// lines, `None` for deleted assignments.
    text: Option<String>,
    /// Key plus original whitespace prefix; `None` for structural lines.
    key_with_prefix: Option<String>,
    /// Byte offset of the identifier inside `key_with_prefix`.
    key_offset: usize,
}

impl Line {
    /// Classifies one line of input.
    ///
    /// A line is an assignment when optional whitespace is followed by a
    /// shell name and `=`; everything else is structural.
    pub fn parse(text: &str) -> Line {
        let bytes = text.as_bytes();
        let mut k = 0;
        while k < bytes.len() && is_shell_space(bytes[k]) {
            k += 1;
        }
        if k < bytes.len() && (bytes[k].is_ascii_alphabetic() || bytes[k] == b'_') {
            let mut e = k + 1;
            while e < bytes.len() {
                if bytes[e] == b'=' {
                    debug_assert!(is_name(&text[k..e]));
                    return Line {
                        text: Some(text[e + 1..].to_string()),
                        key_with_prefix: Some(text[..e].to_string()),
                        key_offset: k,
                    };
                }
                if !bytes[e].is_ascii_alphanumeric() && bytes[e] != b'_' {
                    break;
                }
                e += 1;
            }
        }
        Line {
            text: Some(text.to_string()),
            key_with_prefix: None,
            key_offset: 0,
        }
    }

    /// Builds a fresh assignment line, escaping `value`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not a valid shell name.
    pub fn new_assignment(key: &str, value: &str) -> Line {
        assert!(is_name(key), "invalid shell variable name: {key:?}");
        Line {
            text: Some(escape(value).into_owned()),
            key_with_prefix: Some(key.to_string()),
            key_offset: 0,
        }
    }

    /// The assignment key, if this line is one.
    pub fn key(&self) -> Option<&str> {
        self.key_with_prefix
            .as_deref()
            .map(|p| &p[self.key_offset..])
    }

    /// The key including its original whitespace prefix.
    pub fn key_with_prefix(&self) -> Option<&str> {
        self.key_with_prefix.as_deref()
    }

    /// The raw (still escaped) value of a live assignment.
    pub fn raw_value(&self) -> Option<&str> {
        if self.is_assignment() {
            self.text.as_deref()
        } else {
            None
        }
    }

    /// The verbatim text of a structural line.
    pub fn structural_text(&self) -> Option<&str> {
        if self.is_assignment() {
            None
        } else {
            self.text.as_deref()
        }
    }

    pub fn is_assignment(&self) -> bool {
        self.key_with_prefix.is_some()
    }

    /// True for an assignment whose value was deleted.
    pub fn is_deleted(&self) -> bool {
        self.is_assignment() && self.text.is_none()
    }

    /// Replaces the value, escaping it. Returns true if the line changed.
    ///
    /// Setting a value also drops any whitespace prefix before the key,
    /// so a rewritten assignment starts at column zero.
    ///
    /// # Panics
    ///
    /// Panics if this is not an assignment line.
    pub fn set_value(&mut self, value: &str) -> bool {
        let prefix = self
            .key_with_prefix
            .as_mut()
            .expect("set_value on a structural line");

        let mut changed = false;
        if self.key_offset != 0 {
            prefix.drain(..self.key_offset);
            self.key_offset = 0;
            changed = true;
        }

        let escaped = escape(value);
        if let Some(current) = &self.text {
            if current.as_str() == escaped.as_ref() {
                return changed;
            }
        }
        self.text = Some(escaped.into_owned());
        true
    }

    /// Clears the value but keeps the line. Returns true if it had one.
    ///
    /// # Panics
    ///
    /// Panics if this is not an assignment line.
    pub fn delete(&mut self) -> bool {
        assert!(self.is_assignment(), "delete on a structural line");
        self.text.take().is_some()
    }
}

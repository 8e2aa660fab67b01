//! Non-destructive document over a shell-variable file
//!
//! A [`VarFile`] is the ordered list of a file's lines. Reads unescape on
//! demand with last-assignment-wins semantics; mutations touch only the
//! lines they change. Writing puts every untouched line back exactly as
//! it was read, so comments, blank lines, and formatting quirks survive a
//! rewrite. Lines the parser does not understand are never dropped: the
//! writer turns them into `#NM: ` comments instead.
//!
//! The backing descriptor is kept open from read to write when possible,
//! so the rewrite hits the same inode and keeps its permissions. No
//! locking is performed; concurrent external modification is the
//! caller's problem.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::{is_name, parse_boolean, parse_i64, unescape, Line, UnescapeError};
use crate::storage::fileio;
use crate::storage::FileError;

/// Comment prefix used to neutralize lines this library cannot parse.
/// Reserved: other tooling must not use it for ordinary comments.
pub const DIAGNOSTIC_PREFIX: &str = "#NM: ";

/// A problem found in a document by [`VarFile::problems`].
#[derive(Debug, PartialEq, Eq)]
pub enum Problem<'a> {
    /// A line that is neither blank, a comment, nor an assignment.
    UnparsedLine { index: usize, text: &'a str },

    /// An assignment whose raw value does not unescape.
    InvalidValue {
        index: usize,
        key: &'a str,
        error: UnescapeError,
    },
}

/// An editable shell-variable file.
pub struct VarFile {
    path: PathBuf,
    /// Held from open to write when the file could be opened read-write.
    file: Option<File>,
    lines: Vec<Line>,
    modified: bool,
}

impl VarFile {
    /// Opens an existing file. Fails if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<VarFile, FileError> {
        Self::open_internal(path.into(), false)
    }

    /// Opens a file, starting from an empty document if it does not
    /// exist (the file itself is only created by [`write`](Self::write)).
    pub fn create(path: impl Into<PathBuf>) -> Result<VarFile, FileError> {
        Self::open_internal(path.into(), true)
    }

    fn open_internal(path: PathBuf, create: bool) -> Result<VarFile, FileError> {
        let (file, lines) = match fileio::open_and_read(&path, create)? {
            None => (None, Vec::new()),
            Some(opened) => (opened.file, parse_lines(&opened.content)),
        };
        Ok(VarFile {
            path,
            file,
            lines,
            modified: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retargets the document; the next write goes to the new path unless
    /// a descriptor from open is still held.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    /// True once any mutation changed the document.
    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Forces the next write to happen even without a value change.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// The document's lines, in file order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Looks up `key` and unescapes its value.
    ///
    /// Among duplicate assignments the last one wins. Returns `None` when
    /// the key is absent, deleted, or its value does not parse; an empty
    /// value is `Some("")`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not a valid shell name.
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        let line = &self.lines[self.find_last(key)?];
        unescape(line.raw_value()?).ok()
    }

    /// Like [`get`](Self::get), but an empty value reads as absent.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .map(Cow::into_owned)
    }

    /// Reads `key` as a boolean via [`parse_boolean`], or `fallback`.
    pub fn get_bool(&self, key: &str, fallback: bool) -> bool {
        self.get(key)
            .and_then(|v| parse_boolean(&v))
            .unwrap_or(fallback)
    }

    /// Reads `key` as a bounded integer via [`parse_i64`], or `fallback`.
    pub fn get_i64(&self, key: &str, base: u32, min: i64, max: i64, fallback: i64) -> i64 {
        self.get(key)
            .and_then(|v| parse_i64(&v, base, min, max))
            .unwrap_or(fallback)
    }

    /// Sets or unsets `key`.
    ///
    /// `Some(value)` escapes and stores the value, updating the last
    /// existing assignment or appending a new line; duplicates other than
    /// the last are deleted. `None` deletes the assignment but keeps its
    /// line in place until the next write. Setting a value equal to the
    /// current one does not mark the document modified.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not a valid shell name.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        assert!(is_name(key), "invalid shell variable name: {key:?}");

        // Duplicate keys accumulate in hand-edited files; prune all but
        // the last on the way through.
        let mut last: Option<usize> = None;
        for idx in 0..self.lines.len() {
            if self.lines[idx].key() == Some(key) {
                if let Some(prev) = last {
                    if self.lines[prev].delete() {
                        self.modified = true;
                    }
                }
                last = Some(idx);
            }
        }

        match (value, last) {
            (None, Some(idx)) => {
                if self.lines[idx].delete() {
                    self.modified = true;
                }
            }
            (None, None) => {}
            (Some(v), Some(idx)) => {
                if self.lines[idx].set_value(v) {
                    self.modified = true;
                }
            }
            (Some(v), None) => {
                self.lines.push(Line::new_assignment(key, v));
                self.modified = true;
            }
        }
    }

    /// Like [`set`](Self::set), but an empty string means unset — most
    /// callers cannot tell an empty value from an absent one.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, if value.is_empty() { None } else { Some(value) });
    }

    /// Writes `yes` or `no`.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, Some(if value { "yes" } else { "no" }));
    }

    /// Writes the decimal representation.
    pub fn set_i64(&mut self, key: &str, value: i64) {
        self.set(key, Some(&value.to_string()));
    }

    /// Deletes `key`, keeping its line slot until the next write.
    pub fn unset(&mut self, key: &str) {
        self.set(key, None);
    }

    /// Scans for content the library cannot interpret: unparsed
    /// non-comment lines and assignment values that fail to unescape.
    pub fn problems(&self) -> Vec<Problem<'_>> {
        let mut found = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(text) = line.structural_text() {
                let rest = skip_leading_space(text);
                if !rest.is_empty() && !rest.starts_with('#') {
                    found.push(Problem::UnparsedLine { index, text });
                }
            } else if let Some(raw) = line.raw_value() {
                if let Err(error) = unescape(raw) {
                    found.push(Problem::InvalidValue {
                        index,
                        key: line.key().expect("assignment line has a key"),
                        error,
                    });
                }
            }
        }
        found
    }

    /// Writes the document back if modified; otherwise does nothing.
    ///
    /// `create_mode` is applied only when the file has to be created.
    /// After a successful write the document counts as unmodified, so an
    /// immediate second write is a no-op.
    pub fn write(&mut self, create_mode: u32) -> Result<(), FileError> {
        if !self.modified {
            return Ok(());
        }
        if self.file.is_none() {
            self.file = Some(fileio::open_for_write(&self.path, create_mode)?);
        }
        let content = self.render();
        let file = self.file.as_mut().expect("opened above");
        fileio::rewrite(file, &self.path, &content)?;
        self.modified = false;
        Ok(())
    }

    /// Serializes all lines in original order.
    fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if let Some(text) = line.structural_text() {
                // Anything that is not blank or a comment gets neutralized
                // rather than silently rewritten or dropped.
                let rest = skip_leading_space(text);
                if !rest.is_empty() && !rest.starts_with('#') {
                    out.push_str(DIAGNOSTIC_PREFIX);
                }
                out.push_str(text);
                out.push('\n');
                continue;
            }

            let Some(raw) = line.raw_value() else {
                // Deleted assignment: this is where the line disappears.
                continue;
            };
            let key_with_prefix = line.key_with_prefix().expect("assignment line");

            // Re-check that our own reader can parse the value back.
            if unescape(raw).is_ok() {
                out.push_str(key_with_prefix);
                out.push('=');
                out.push_str(raw);
                out.push('\n');
            } else {
                let key = line.key().expect("assignment line has a key");
                out.push_str(key);
                out.push_str("=\n");
                out.push_str(DIAGNOSTIC_PREFIX);
                out.push_str(key_with_prefix);
                out.push('=');
                out.push_str(raw);
                out.push('\n');
            }
        }
        out
    }

    fn find_last(&self, key: &str) -> Option<usize> {
        assert!(is_name(key), "invalid shell variable name: {key:?}");
        self.lines.iter().rposition(|l| l.key() == Some(key))
    }
}

fn parse_lines(content: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut rest = content;
    while let Some(n) = rest.find('\n') {
        lines.push(Line::parse(&rest[..n]));
        rest = &rest[n + 1..];
    }
    // A final unterminated line still counts; it gains a newline on write.
    if !rest.is_empty() {
        lines.push(Line::parse(rest));
    }
    lines
}

fn skip_leading_space(text: &str) -> &str {
    text.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r'])
}

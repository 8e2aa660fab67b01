//! # Storage Layer
//!
//! File-backed documents and the thin file-access layer underneath.
//!
//! ## On-disk format
//!
//! UTF-8 text, `\n`-terminated lines (no `\r\n` normalization). Each line
//! is blank, a `#` comment, a `KEY=value` assignment with the value in
//! shell-escaped form, or a `#NM: ` diagnostic comment this library
//! emitted for content it could not parse.
//!
//! ## Resource model
//!
//! Single-threaded and synchronous. Reads are bounded by
//! [`MAX_FILE_SIZE`]; the descriptor from a read-write open is held until
//! the write so the rewrite lands on the same inode. No file locking.
//!
//! ## Key Types
//!
//! - [`VarFile`] - an editable shell-variable file
//! - [`FileError`] - I/O-level failures with the offending path

mod fileio;
mod varfile;

pub use fileio::{FileError, MAX_FILE_SIZE};
pub use varfile::{Problem, VarFile, DIAGNOSTIC_PREFIX};

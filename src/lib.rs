//! shellvar - Non-destructive editor for shell-variable files
//!
//! Reads files of `KEY=VALUE` shell assignments (the sysconfig/ifcfg
//! style), exposes a key/value view with shell-compatible unescaping, and
//! writes them back preserving every line it did not change: comments,
//! blank lines, formatting quirks, and content it cannot parse.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{escape, is_name, parse_boolean, parse_i64, unescape, Line, UnescapeError};
pub use storage::{FileError, Problem, VarFile, DIAGNOSTIC_PREFIX, MAX_FILE_SIZE};

//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `get`   | Print a key's unescaped value |
//! | `set`   | Escape and store a value, creating the file if needed |
//! | `unset` | Remove a key without touching any other line |
//! | `list`  | All readable key/value pairs, last assignment wins |
//! | `check` | Report lines and values the parser cannot interpret |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod vars;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};

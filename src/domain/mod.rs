//! Domain logic for shell-variable files
//!
//! Pure code with no I/O: the shell quoting subset (escape/unescape),
//! the variable-name grammar, the line model, and value parsing.

mod escape;
mod line;
mod name;
mod unescape;
mod value;

pub use escape::escape;
pub use line::Line;
pub use name::is_name;
pub use unescape::{unescape, UnescapeError};
pub use value::{parse_boolean, parse_i64};

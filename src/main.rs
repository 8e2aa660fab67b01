//! shellvar CLI - Non-destructive editor for shell-style KEY=VALUE files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = shellvar::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

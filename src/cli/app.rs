//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::vars;

#[derive(Parser)]
#[command(name = "shellvar")]
#[command(author, version, about = "Non-destructive editor for shell-style KEY=VALUE files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value of a key
    Get {
        /// File to read
        file: PathBuf,

        /// Variable name
        key: String,

        /// Value to print when the key is absent
        #[arg(long)]
        default: Option<String>,
    },

    /// Set a key, creating the file if needed
    Set {
        /// File to edit
        file: PathBuf,

        /// Variable name
        key: String,

        /// Value to store (escaped as needed)
        value: String,

        /// Permissions for a newly created file, in octal
        #[arg(long, value_parser = parse_octal_mode, default_value = "644")]
        mode: u32,
    },

    /// Remove a key, keeping every other line intact
    Unset {
        /// File to edit
        file: PathBuf,

        /// Variable name
        key: String,
    },

    /// List all readable key/value pairs
    List {
        /// File to read
        file: PathBuf,
    },

    /// Report content the parser cannot interpret
    Check {
        /// File to read
        file: PathBuf,
    },
}

fn parse_octal_mode(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s, 8).map_err(|_| format!("'{s}' is not an octal mode"))
}

/// Parses arguments and runs the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    vars::run(cli.command, &output)
}

//! Variable CLI commands

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::app::Commands;
use super::output::Output;
use crate::domain::is_name;
use crate::storage::{Problem, VarFile};

pub fn run(cmd: Commands, output: &Output) -> Result<()> {
    match cmd {
        Commands::Get { file, key, default } => get(output, &file, &key, default.as_deref()),
        Commands::Set {
            file,
            key,
            value,
            mode,
        } => set(output, &file, &key, &value, mode),
        Commands::Unset { file, key } => unset(output, &file, &key),
        Commands::List { file } => list(output, &file),
        Commands::Check { file } => check(output, &file),
    }
}

/// CLI keys are user input, not a programming contract: reject bad ones
/// before they reach the library's assertions.
fn require_name(key: &str) -> Result<()> {
    if !is_name(key) {
        bail!("'{key}' is not a valid shell variable name");
    }
    Ok(())
}

fn open(file: &Path) -> Result<VarFile> {
    VarFile::open(file).with_context(|| format!("failed to open {}", file.display()))
}

fn get(output: &Output, file: &Path, key: &str, default: Option<&str>) -> Result<()> {
    require_name(key)?;
    let doc = open(file)?;

    let value = match doc.get(key) {
        Some(v) => v.into_owned(),
        None => match default {
            Some(d) => d.to_string(),
            None => bail!("'{key}' is not set in {}", file.display()),
        },
    };

    if output.is_json() {
        output.data(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{value}");
    }
    Ok(())
}

fn set(output: &Output, file: &Path, key: &str, value: &str, mode: u32) -> Result<()> {
    require_name(key)?;
    let mut doc = VarFile::create(file)
        .with_context(|| format!("failed to open {}", file.display()))?;

    doc.set(key, Some(value));
    if doc.modified() {
        output.verbose(&format!("rewriting {}", file.display()));
    } else {
        output.verbose("value unchanged, not rewriting");
    }
    doc.write(mode)
        .with_context(|| format!("failed to write {}", file.display()))?;

    output.success(&format!("Set {key} in {}", file.display()));
    Ok(())
}

fn unset(output: &Output, file: &Path, key: &str) -> Result<()> {
    require_name(key)?;
    let mut doc = open(file)?;

    doc.unset(key);
    if !doc.modified() {
        output.success(&format!("{key} was not set in {}", file.display()));
        return Ok(());
    }
    doc.write(0o644)
        .with_context(|| format!("failed to write {}", file.display()))?;

    output.success(&format!("Removed {key} from {}", file.display()));
    Ok(())
}

fn list(output: &Output, file: &Path) -> Result<()> {
    let doc = open(file)?;

    // File order, one entry per key, last assignment wins.
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for line in doc.lines() {
        let Some(key) = line.key() else { continue };
        if !seen.insert(key) {
            continue;
        }
        if let Some(value) = doc.get(key) {
            entries.push((key, value));
        }
    }

    if output.is_json() {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v.as_ref())))
            .collect();
        output.data(&map);
    } else {
        for (key, value) in &entries {
            output.line(&format!("{key}={value}"));
        }
    }
    Ok(())
}

fn check(output: &Output, file: &Path) -> Result<()> {
    let doc = open(file)?;
    let problems = doc.problems();

    if output.is_json() {
        let items: Vec<_> = problems
            .iter()
            .map(|p| match p {
                Problem::UnparsedLine { index, text } => serde_json::json!({
                    "line": index + 1,
                    "kind": "unparsed",
                    "text": text,
                }),
                Problem::InvalidValue { index, key, error } => serde_json::json!({
                    "line": index + 1,
                    "kind": "invalid_value",
                    "key": key,
                    "error": error.to_string(),
                }),
            })
            .collect();
        output.data(&items);
    } else {
        for problem in &problems {
            match problem {
                Problem::UnparsedLine { index, text } => {
                    output.line(&format!("line {}: unparsed: {text}", index + 1));
                }
                Problem::InvalidValue { index, key, error } => {
                    output.line(&format!("line {}: {key}: {error}", index + 1));
                }
            }
        }
    }

    if !problems.is_empty() {
        bail!("{} problem(s) in {}", problems.len(), file.display());
    }
    output.success("OK");
    Ok(())
}

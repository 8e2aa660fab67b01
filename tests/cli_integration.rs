//! CLI integration tests for shellvar
//!
//! These tests drive the binary against real temp files, verifying the
//! commands work together and that rewrites leave untouched lines alone.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the shellvar binary
fn shellvar_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("shellvar"))
}

/// Create a temp dir holding one file with the given content
fn setup_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ifcfg-eth0");
    fs::write(&path, content).unwrap();
    (dir, path)
}

// =============================================================================
// Get Tests
// =============================================================================

#[test]
fn test_get_prints_unescaped_value() {
    let (_dir, path) = setup_file("DEVICE=eth0\nNAME=\"wired #1\"\n");

    shellvar_cmd()
        .arg("get")
        .arg(&path)
        .arg("NAME")
        .assert()
        .success()
        .stdout("wired #1\n");
}

#[test]
fn test_get_last_assignment_wins() {
    let (_dir, path) = setup_file("FOO=1\nFOO=2\n");

    shellvar_cmd()
        .arg("get")
        .arg(&path)
        .arg("FOO")
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_get_missing_key_fails() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .arg("get")
        .arg(&path)
        .arg("BAR")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_get_missing_key_with_default() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .args(["get", path.to_str().unwrap(), "BAR", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_get_unparsable_value_reads_as_absent() {
    let (_dir, path) = setup_file("FOO=`date`\n");

    shellvar_cmd()
        .args(["get", path.to_str().unwrap(), "FOO", "--default", "x"])
        .assert()
        .success()
        .stdout("x\n");
}

#[test]
fn test_get_rejects_invalid_key() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .args(["get", path.to_str().unwrap(), "not a key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid shell variable name"));
}

#[test]
fn test_get_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent");

    shellvar_cmd()
        .args(["get", path.to_str().unwrap(), "FOO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn test_get_json_format() {
    let (_dir, path) = setup_file("FOO=\"a b\"\n");

    shellvar_cmd()
        .args(["--format", "json", "get", path.to_str().unwrap(), "FOO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":\"a b\""));
}

// =============================================================================
// Set Tests
// =============================================================================

#[test]
fn test_set_preserves_other_lines() {
    let (_dir, path) = setup_file("# hello\n\nBAR=baz\nTAIL=1\n");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "BAR", "new value"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set BAR"));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# hello\n\nBAR=\"new value\"\nTAIL=1\n"
    );
}

#[test]
fn test_set_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new-file");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "TYPE", "Ethernet"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "TYPE=Ethernet\n");
}

#[test]
fn test_set_appends_new_key() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "BAR", "2"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=1\nBAR=2\n");
}

#[test]
fn test_set_prunes_duplicates() {
    let (_dir, path) = setup_file("FOO=1\nMID=x\nFOO=2\n");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "FOO", "3"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "MID=x\nFOO=3\n");
}

#[test]
fn test_set_value_with_newline_uses_ansi_c() {
    let (_dir, path) = setup_file("");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "BANNER", "a\nb"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "BANNER=$'a\\nb'\n"
    );

    shellvar_cmd()
        .args(["get", path.to_str().unwrap(), "BANNER"])
        .assert()
        .success()
        .stdout("a\nb\n");
}

#[test]
fn test_set_same_value_leaves_file_alone() {
    let (_dir, path) = setup_file("no shell here\nFOO=1\n");

    shellvar_cmd()
        .args(["set", path.to_str().unwrap(), "FOO", "1"])
        .assert()
        .success();

    // Not modified, so not rewritten: the unparsed line is untouched.
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "no shell here\nFOO=1\n"
    );
}

// =============================================================================
// Unset Tests
// =============================================================================

#[test]
fn test_unset_removes_only_that_line() {
    let (_dir, path) = setup_file("# keep\nFOO=1\nBAR=2\n");

    shellvar_cmd()
        .args(["unset", path.to_str().unwrap(), "FOO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed FOO"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "# keep\nBAR=2\n");
}

#[test]
fn test_unset_absent_key_leaves_file_alone() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .args(["unset", path.to_str().unwrap(), "BAR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not set"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=1\n");
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_shows_last_wins_pairs() {
    let (_dir, path) = setup_file("# c\nFOO=1\nBAR=\"a b\"\nFOO=2\n");

    shellvar_cmd()
        .args(["list", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("FOO=2\nBAR=a b\n");
}

#[test]
fn test_list_json_format() {
    let (_dir, path) = setup_file("FOO=1\n");

    shellvar_cmd()
        .args(["--format", "json", "list", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"FOO\":\"1\"}"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_clean_file() {
    let (_dir, path) = setup_file("# comment\nFOO=1\n\nBAR=\"x\"\n");

    shellvar_cmd()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn test_check_reports_problems() {
    let (_dir, path) = setup_file("garbage here\nFOO=`x`\n");

    shellvar_cmd()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("line 1: unparsed"))
        .stdout(predicate::str::contains("line 2: FOO"))
        .stderr(predicate::str::contains("2 problem(s)"));
}

#[test]
fn test_check_does_not_modify() {
    let content = "garbage here\nFOO=1\n";
    let (_dir, path) = setup_file(content);

    shellvar_cmd()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

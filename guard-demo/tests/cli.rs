//! Exit codes and JSON output of the `council-guard` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"card_id": "card_recover_001", "label": "回復"},
    {"card_id": "card_explore_001", "label": "探索"}
]"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn validate(dir: &TempDir, response: &str, energy: i32, mood: i32) -> Output {
    let catalog = write(dir.path(), "catalog.json", CATALOG);
    let response = write(dir.path(), "response.json", response);
    let config = write(dir.path(), "guard.yaml", "gate:\n  max_attempts: 3\n");

    Command::new(env!("CARGO_BIN_EXE_council-guard"))
        .arg("validate")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--response")
        .arg(&response)
        .arg("--energy")
        .arg(energy.to_string())
        .arg("--mood")
        .arg(mood.to_string())
        .arg("--config")
        .arg(&config)
        .env("RUST_LOG", "off")
        .output()
        .expect("run council-guard")
}

fn verdict(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("verdict json on stdout")
}

#[test]
fn valid_response_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let output = validate(
        &dir,
        r#"{"recommendations":[{"rank":"A","card_id":"card_recover_001"}],"autopick":"A"}"#,
        1,
        2,
    );

    assert_eq!(output.status.code(), Some(0));
    let json = verdict(&output);
    assert_eq!(json["valid"], true);
    assert_eq!(json["reason"], "ok");
}

#[test]
fn low_state_violation_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    let output = validate(
        &dir,
        r#"{"recommendations":[{"rank":"A","card_id":"card_explore_001"}],"autopick":"A"}"#,
        1,
        2,
    );

    assert_eq!(output.status.code(), Some(1));
    let json = verdict(&output);
    assert_eq!(json["valid"], false);
    assert_eq!(json["code"], "LowStateViolation");
}

#[test]
fn wrong_typed_autopick_still_prints_a_verdict() {
    let dir = TempDir::new().expect("tempdir");
    let output = validate(
        &dir,
        r#"{"recommendations":[{"rank":"A","card_id":"card_recover_001"}],"autopick":1}"#,
        3,
        3,
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(verdict(&output)["code"], "AutopickMismatch");
}

#[test]
fn missing_response_file_exits_two() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = write(dir.path(), "catalog.json", CATALOG);

    let output = Command::new(env!("CARGO_BIN_EXE_council-guard"))
        .arg("validate")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--response")
        .arg(dir.path().join("absent.json"))
        .args(["--energy", "3", "--mood", "3"])
        .env("RUST_LOG", "off")
        .output()
        .expect("run council-guard");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unable to read response"));
}

#[test]
fn classify_reports_low_state() {
    let output = Command::new(env!("CARGO_BIN_EXE_council-guard"))
        .args(["classify", "--energy", "5", "--mood", "-1"])
        .env("RUST_LOG", "off")
        .output()
        .expect("run council-guard");

    assert_eq!(output.status.code(), Some(0));
    let json = verdict(&output);
    assert_eq!(json["low_state"], true);
    assert_eq!(json["mood"], -1);
}

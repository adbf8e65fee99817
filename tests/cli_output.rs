//! CLI output contract
//!
//! - stdout carries exactly one JSON object per invocation
//! - failures are reported as `{"status": "error", ...}` with a non-zero exit

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn docgate(config: &Path, data: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docgate"))
        .arg("--config")
        .arg(config)
        .arg("--data")
        .arg(data)
        .args(args)
        .output()
        .expect("run docgate")
}

/// Parse stdout, requiring a single JSON line
fn single_json(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout: {}", stdout);
    serde_json::from_str(lines[0]).unwrap()
}

#[test]
fn test_config_file_does_not_pollute_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("docgate.json");
    let data = dir.path().join("db.json");
    std::fs::write(&config, r#"{ "notify_prefix": "Heroes" }"#).unwrap();

    let added = docgate(&config, &data, &["add", "Spark"]);
    assert!(added.status.success());
    let body = single_json(&added);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["id"], "1");

    let listed = docgate(&config, &data, &["list"]);
    assert!(listed.status.success());
    assert_eq!(single_json(&listed)["data"][0]["name"], "Spark");
}

#[test]
fn test_failure_reported_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("docgate.json");
    let data = dir.path().join("db.json");
    std::fs::write(&config, "{}").unwrap();

    let output = docgate(&config, &data, &["update", "9", "Ember"]);
    assert!(!output.status.success());

    let body = single_json(&output);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "DOCGATE_CLI_OPERATION_FAILED");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("DOCGATE_STORE_NOT_FOUND"));
}

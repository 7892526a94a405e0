//! CLI integration tests for the offline commands.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn support_agent() -> Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("support-agent");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    support_agent()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("route"))
        .stdout(predicate::str::contains("init-prompts"));
}

#[test]
fn route_support_by_keyword() {
    support_agent()
        .args(["route", "please reset my password"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("support"))
        .stdout(predicate::str::contains("password"));
}

#[test]
fn route_support_by_pattern() {
    support_agent()
        .args(["route", "can you help me with something?"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("support"));
}

#[test]
fn route_exploratory() {
    support_agent()
        .args(["route", "Tell me about your products"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("exploratory"));
}

#[test]
fn route_json() {
    let output = support_agent()
        .args(["--format", "json", "route", "My laptop won't turn on"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).unwrap_or_default();
    assert_eq!(json["route"], "support");
    assert_eq!(json["keyword_category"], "device_troubleshooting");
}

#[test]
fn init_prompts_into_directory() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    support_agent()
        .args(["init-prompts", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("support.md"))
        .stdout(predicate::str::contains("explorer.md"));
    assert!(dir.path().join("support.md").exists());
}

#[test]
fn ask_without_api_key_fails() {
    support_agent()
        .env_remove("OPENAI_API_KEY")
        .env_remove("SUPPORT_API_KEY")
        .args(["ask", "How do I reset my password?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key missing"));
}

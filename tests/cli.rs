//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("replacer-bot")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("invoke"));
}

#[test]
fn test_run_requires_repo_url() {
    Command::cargo_bin("replacer-bot")
        .unwrap()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--repo-url"));
}

#[test]
fn test_invoke_with_missing_tool_fails() {
    Command::cargo_bin("replacer-bot")
        .unwrap()
        .args([
            "invoke",
            "--root",
            ".",
            "--replacer-file",
            "/nonexistent/replacer-tool",
        ])
        .assert()
        .failure();
}

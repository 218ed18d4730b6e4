//! Binary smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bs() -> Command {
    Command::cargo_bin("bs").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    bs().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version() {
    bs().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_config_prints_file_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("brainstorm.yml");
    std::fs::write(
        &path,
        "llm:\n  provider: openai\n  model: gpt-4o\n  api-key-env: OPENAI_API_KEY\n  base-url: https://api.openai.com\nsession:\n  idea-count: 6\n",
    )
    .unwrap();

    bs().env("HOME", temp.path())
        .args(["--config", path.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider: openai"))
        .stdout(predicate::str::contains("idea-count: 6"));
}

#[test]
fn test_generate_requires_subject() {
    bs().args(["generate", "--audience", "students"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--subject"));
}

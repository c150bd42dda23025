use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `budgie` command isolated from any user configuration
fn budgie(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("budgie").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("BUDGIE_BASE_URL")
        .env_remove("VLLM_BASE_URL")
        .env_remove("BUDGIE_MODEL")
        .env_remove("VLLM_MODEL")
        .env_remove("BUDGIE_DATABASE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_shows_usage() {
    let dir = TempDir::new().unwrap();
    budgie(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn tools_lists_budget_tools() {
    let dir = TempDir::new().unwrap();
    budgie(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("set_monthly_income"))
        .stdout(predicate::str::contains("get_budget_status"))
        .stdout(predicate::str::contains("13 tools registered"));

    // Listing does not create a ledger file
    assert!(!dir.path().join("budget.db").exists());
}

#[test]
fn invalid_base_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    budgie(&dir)
        .args(["--base-url", "localhost:8000", "how much did I spend?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Base URL must start with http://"));
}

#[test]
fn zero_iterations_is_rejected() {
    let dir = TempDir::new().unwrap();
    budgie(&dir)
        .args(["--max-iterations", "0", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}

#[test]
fn message_and_subcommand_conflict() {
    let dir = TempDir::new().unwrap();
    budgie(&dir)
        .args(["hello", "tools"])
        .assert()
        .failure();
}

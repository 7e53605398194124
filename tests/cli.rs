//! Tests for the `linkarchive` command-line interface
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn linkarchive() -> Command {
    let mut cmd = Command::cargo_bin("linkarchive").unwrap();
    cmd.env_remove("LINKARCHIVE_ENV")
        .env_remove("LINKARCHIVE_HOST")
        .env_remove("LINKARCHIVE_PORT")
        .env_remove("LINKARCHIVE_STATIC_DIR");
    cmd
}

#[test]
fn routes_lists_table_in_match_order() {
    let output = linkarchive().arg("routes").assert().success().get_output().stdout.clone();
    let table = String::from_utf8(output).unwrap();

    let position = |needle: &str| {
        table
            .find(needle)
            .unwrap_or_else(|| panic!("{needle} missing from:\n{table}"))
    };

    let negotiated = position("content-type ~ application/json");
    assert!(position("/api/archives/{slug}") < position("/static/{*path}"));
    assert!(position("/static/{*path}") < negotiated);
    assert!(negotiated < position("| show_archive\n"));
    assert_eq!(table.matches("create_archive_legacy").count(), 3);
}

#[test]
fn env_example_documents_variables() {
    linkarchive()
        .arg("env-example")
        .assert()
        .success()
        .stdout(contains("LINKARCHIVE_ENV=production"))
        .stdout(contains("LINKARCHIVE_STATIC_DIR="))
        .stdout(contains("LINKARCHIVE_PORT=8080"));
}

#[test]
fn check_env_accepts_defaults() {
    linkarchive()
        .arg("check-env")
        .assert()
        .success()
        .stdout(contains("Environment validation successful"))
        .stdout(contains("embedded bundle"));
}

#[test]
fn check_env_rejects_bad_host() {
    linkarchive()
        .arg("check-env")
        .env("LINKARCHIVE_HOST", "not-an-ip")
        .assert()
        .failure()
        .stderr(contains("LINKARCHIVE_HOST").and(contains("CRITICAL")));
}

#[test]
fn unknown_command_fails() {
    linkarchive().arg("add-route").assert().failure();
}

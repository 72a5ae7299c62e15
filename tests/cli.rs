//
//  sourcecraft-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end runs of the `src` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `src` command isolated from the user's environment.
fn src(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("src").unwrap();
    cmd.env_remove("SOURCECRAFT_TOKEN")
        .env_remove("SOURCECRAFT_API_URL")
        .env_remove("SOURCECRAFT_REPO")
        .env("SOURCECRAFT_NO_PROMPT", "1")
        .arg("--config")
        .arg(config_dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_lists_command_groups() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo"))
        .stdout(predicate::str::contains("workflow"))
        .stdout(predicate::str::contains("access"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("src version "));
}

#[test]
fn test_config_refuses_token() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .args(["config", "set", "token", "secret"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Use 'src auth login' instead."));
}

#[test]
fn test_config_round_trip() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .args(["config", "set", "organization", "acme"])
        .assert()
        .success();

    src(&dir)
        .args(["config", "get", "organization"])
        .assert()
        .success()
        .stdout("acme\n");

    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("organization = \"acme\""));
}

#[test]
fn test_config_hides_legacy_token() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "token = \"legacy\"\n").unwrap();

    src(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token=<hidden>"))
        .stdout(predicate::str::contains("legacy").not());
}

#[test]
fn test_invalid_role_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .args(["access", "role", "add", "acme/app", "u-1", "owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Allowed roles: viewer"));
}

#[test]
fn test_completion_script() {
    let dir = TempDir::new().unwrap();
    src(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_src"));
}

#[test]
fn test_repo_list_json() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/orgs/acme/repos")
        .match_header("authorization", "Bearer env-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"repositories":[{"slug":"app","name":"App"}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    src(&dir)
        .env("SOURCECRAFT_TOKEN", "env-token")
        .env("SOURCECRAFT_API_URL", server.url())
        .args(["--json", "repo", "list", "--org", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slug\": \"app\""));

    mock.assert();
}

#[test]
fn test_missing_repository_exits_with_not_found_code() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repos/acme/ghost")
        .with_status(404)
        .create();

    let dir = TempDir::new().unwrap();
    src(&dir)
        .env("SOURCECRAFT_TOKEN", "env-token")
        .env("SOURCECRAFT_API_URL", server.url())
        .args(["repo", "view", "acme/ghost"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains(
            "repository 'acme/ghost' not found or you don't have permission",
        ));
}

#[test]
fn test_rejected_token_exits_with_auth_code() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/orgs/acme/repos")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"token expired"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    src(&dir)
        .env("SOURCECRAFT_TOKEN", "env-token")
        .env("SOURCECRAFT_API_URL", server.url())
        .args(["repo", "list", "--org", "acme"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid or expired token"));
}

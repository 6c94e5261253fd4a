use predicates::prelude::*;

use crate::helpers::TestEnv;

#[test]
fn help_exits_successfully() {
    let env = TestEnv::new();
    env.githooks()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shared"));
}

#[test]
fn trailing_help_shows_subcommand_help() {
    let env = TestEnv::new();
    env.githooks()
        .args(["shared", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add"));
}

#[test]
fn unknown_command_fails() {
    let env = TestEnv::new();
    env.githooks().arg("frobnicate").assert().failure();
}

#[test]
fn version_prints_crate_version() {
    let env = TestEnv::new();
    env.githooks()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_outside_repository_fails() {
    let env = TestEnv::new();
    let outside = env.temp.path().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    env.githooks()
        .current_dir(&outside)
        .env("GIT_CEILING_DIRECTORIES", env.temp.path())
        .arg("list")
        .assert()
        .failure();
}

#[test]
fn list_json_reports_states() {
    let env = TestEnv::new();
    env.write_hook("pre-commit/lint", "#!/bin/sh\nexit 0\n");
    env.write_hook("pre-push", "#!/bin/sh\nexit 0\n");

    env.githooks()
        .args(["accept", "pre-push"])
        .assert()
        .success();

    let output = env
        .githooks()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);

    let state_of = |trigger: &str| {
        listed
            .iter()
            .find(|h| h["trigger"] == trigger)
            .map(|h| h["state"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(state_of("pre-commit"), "pending-new");
    assert_eq!(state_of("pre-push"), "active");
}

#[test]
fn list_rejects_unknown_trigger() {
    let env = TestEnv::new();
    env.githooks()
        .args(["list", "pre-nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown trigger"));
}

#[test]
fn readme_add_then_update() {
    let env = TestEnv::new();
    env.githooks().args(["readme", "add"]).assert().success();
    let readme = env.root().join(".githooks/README.md");
    assert!(readme.is_file());

    std::fs::write(&readme, "stale\n").unwrap();
    env.githooks().args(["readme", "add"]).assert().failure();
    env.githooks().args(["readme", "update"]).assert().success();
    assert_ne!(std::fs::read_to_string(&readme).unwrap(), "stale\n");
}

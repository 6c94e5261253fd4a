use predicates::prelude::*;
use std::fs;

use crate::helpers::{create_hook_source, TestEnv};

#[test]
fn shared_hooks_run_before_local_hooks() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    let body = |label: &str| format!("#!/bin/sh\necho {label} >> '{}'\n", log.display());

    let first = env.temp.path().join("sources/first-hooks");
    let second = env.temp.path().join("sources/second-hooks");
    create_hook_source(&first, &[("pre-commit/one", &body("first"))]);
    create_hook_source(&second, &[(".githooks/pre-commit/two", &body("second"))]);
    env.write_hook("pre-commit/local", &body("local"));

    env.githooks()
        .args(["shared", "add", "--global", first.to_str().unwrap()])
        .assert()
        .success();
    env.githooks()
        .args(["shared", "add", second.to_str().unwrap()])
        .assert()
        .success();
    assert!(fs::read_to_string(env.root().join(".githooks/.shared"))
        .unwrap()
        .contains("second-hooks"));

    env.githooks()
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloned"));

    env.git(&["config", "githooks.autoaccept", "true"]);
    env.githooks().args(["run", "pre-commit"]).assert().success();

    let order: Vec<String> = fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(order, vec!["first", "second", "local"]);
}

#[test]
fn shared_list_shows_both_scopes() {
    let env = TestEnv::new();
    env.githooks()
        .args(["shared", "add", "--global", "https://example.com/org/global-hooks.git"])
        .assert()
        .success();
    env.githooks()
        .args(["shared", "add", "--local", "git@example.com:team/local-hooks.git"])
        .assert()
        .success();

    env.githooks()
        .args(["shared", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("global-hooks"))
        .stdout(predicate::str::contains("team_local_hooks"));

    env.githooks()
        .args(["shared", "clear", "--global"])
        .assert()
        .success();
    env.githooks()
        .args(["shared", "list", "--global"])
        .assert()
        .success()
        .stdout(predicate::str::contains("global-hooks").not());
}

#[test]
fn adding_twice_is_reported() {
    let env = TestEnv::new();
    let url = "https://example.com/hooks.git";
    env.githooks().args(["shared", "add", url]).assert().success();
    env.githooks()
        .args(["shared", "add", url])
        .assert()
        .success()
        .stdout(predicate::str::contains("already listed"));
}

#[test]
fn missing_shared_repository_fails_when_required() {
    let env = TestEnv::new();
    env.githooks()
        .args(["shared", "add", "https://example.invalid/missing.git"])
        .assert()
        .success();

    env.githooks().args(["run", "pre-commit"]).assert().success();

    env.git(&["config", "githooks.failOnNonExistingSharedHooks", "true"]);
    env.githooks()
        .args(["run", "pre-commit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git hooks pull"));
}

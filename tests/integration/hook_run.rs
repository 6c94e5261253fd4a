use predicates::prelude::*;
use std::fs;
use std::path::Path;

use crate::helpers::TestEnv;

fn logging_hook(log: &Path, label: &str) -> String {
    format!(
        "#!/bin/sh\necho \"{label} $*\" >> '{}'\n",
        log.display()
    )
}

fn log_lines(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn new_hook_is_declined_until_accepted() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("pre-commit/lint", &logging_hook(&log, "lint"));

    env.githooks()
        .args(["run", "pre-commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not accepted"));
    assert!(log_lines(&log).is_empty());
    assert!(env.ledger().is_empty());

    env.githooks()
        .args(["accept", "pre-commit", "lint"])
        .assert()
        .success();
    let ledger = env.ledger();
    assert_eq!(ledger.lines().count(), 1);
    let hash = ledger.split_whitespace().next().unwrap();
    assert_eq!(hash.len(), 32);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

    env.githooks()
        .args(["run", "pre-commit"])
        .assert()
        .success();
    assert_eq!(log_lines(&log), vec!["lint ".to_string()]);
}

#[test]
fn changed_hook_needs_new_acceptance() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    let hook = env.write_hook("pre-commit", &logging_hook(&log, "v1"));

    env.githooks().args(["accept", "pre-commit"]).assert().success();
    fs::write(&hook, logging_hook(&log, "v2")).unwrap();

    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert!(log_lines(&log).is_empty());

    let listed = env
        .githooks()
        .args(["list", "--json", "pre-commit"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8_lossy(&listed).contains("pending-changed"));
}

#[test]
fn autoaccept_runs_new_hooks_non_interactively() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("pre-commit/check", &logging_hook(&log, "check"));
    env.git(&["config", "githooks.autoaccept", "true"]);

    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert_eq!(log_lines(&log).len(), 1);
    assert_eq!(env.ledger().lines().count(), 1);
}

#[test]
fn hook_arguments_are_passed_through() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("commit-msg", &logging_hook(&log, "msg"));
    env.githooks().args(["accept", "commit-msg"]).assert().success();

    env.githooks()
        .args(["run", "commit-msg", ".git/COMMIT_EDITMSG"])
        .assert()
        .success();
    assert_eq!(log_lines(&log), vec!["msg .git/COMMIT_EDITMSG".to_string()]);
}

#[test]
fn failing_hook_fails_the_run_and_stops() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("pre-commit/a-fail", "#!/bin/sh\nexit 3\n");
    env.write_hook("pre-commit/b-after", &logging_hook(&log, "after"));
    env.githooks().args(["accept", "pre-commit"]).assert().success();

    env.githooks()
        .args(["run", "pre-commit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a-fail"));
    assert!(log_lines(&log).is_empty());
}

#[test]
fn disable_all_skips_every_hook() {
    let env = TestEnv::new();
    env.write_hook("pre-commit", "#!/bin/sh\nexit 1\n");
    env.githooks().args(["accept", "pre-commit"]).assert().success();

    env.githooks().args(["disable", "--all"]).assert().success();
    env.githooks().args(["run", "pre-commit"]).assert().success();

    env.githooks().args(["enable", "--all"]).assert().success();
    env.githooks().args(["run", "pre-commit"]).assert().failure();
}

#[test]
fn disable_environment_variable_skips_hooks() {
    let env = TestEnv::new();
    env.write_hook("pre-commit", "#!/bin/sh\nexit 1\n");
    env.githooks().args(["accept", "pre-commit"]).assert().success();

    env.githooks()
        .env("GITHOOKS_DISABLE", "1")
        .args(["run", "pre-commit"])
        .assert()
        .success();
}

#[test]
fn disabled_hook_is_skipped_with_enable_hint() {
    let env = TestEnv::new();
    env.write_hook("pre-commit/strict", "#!/bin/sh\nexit 1\n");

    env.githooks()
        .args(["disable", "pre-commit", "strict"])
        .assert()
        .success();
    env.githooks()
        .args(["run", "pre-commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("git hooks enable pre-commit strict"));

    env.githooks()
        .args(["enable", "pre-commit", "strict"])
        .assert()
        .success();
    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert!(!env.ledger().contains("disabled>"));
}

#[test]
fn trusted_repository_runs_without_acceptance() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("pre-commit", &logging_hook(&log, "trusted"));

    env.githooks().arg("trust").assert().success();
    assert!(env.root().join(".githooks/trust-all").is_file());

    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert_eq!(log_lines(&log).len(), 1);
    assert!(env.ledger().is_empty());

    env.githooks().args(["trust", "revoke"]).assert().success();
    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert_eq!(log_lines(&log).len(), 1);
}

#[test]
fn ignore_patterns_override_trust() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook("pre-commit/kept", &logging_hook(&log, "kept"));
    env.write_hook("pre-commit/skipped.sh", &logging_hook(&log, "skipped"));
    fs::write(env.root().join(".githooks/pre-commit/.ignore"), "*.sh\n").unwrap();

    env.githooks().arg("trust").assert().success();
    env.githooks().args(["run", "pre-commit"]).assert().success();
    assert_eq!(log_lines(&log), vec!["kept ".to_string()]);
}

#[test]
fn pre_push_hooks_receive_stdin() {
    let env = TestEnv::new();
    let log = env.temp.path().join("hook.log");
    env.write_hook(
        "pre-push/a",
        &format!("#!/bin/sh\ncat >> '{}'\n", log.display()),
    );
    env.write_hook(
        "pre-push/b",
        &format!("#!/bin/sh\ncat >> '{}'\n", log.display()),
    );
    env.githooks().args(["accept", "pre-push"]).assert().success();

    env.githooks()
        .args(["run", "pre-push", "origin", "url"])
        .write_stdin("refs/heads/main abc refs/heads/main def\n")
        .assert()
        .success();
    assert_eq!(log_lines(&log).len(), 2);
}

#[test]
fn unknown_trigger_is_rejected() {
    let env = TestEnv::new();
    env.githooks()
        .args(["run", "pre-nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown trigger"));
}

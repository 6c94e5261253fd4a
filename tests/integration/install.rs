use predicates::prelude::*;
use std::fs;

use crate::helpers::TestEnv;

#[test]
fn dry_run_changes_nothing() {
    let env = TestEnv::new();
    env.githooks()
        .args(["install", "--single", "--dry-run", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("write hook"))
        .stdout(predicate::str::contains("githooks.single.install"));

    assert!(!env.root().join(".git/hooks/pre-commit").exists());
}

#[test]
fn single_install_moves_existing_hook_aside() {
    let env = TestEnv::new();
    let hooks_dir = env.root().join(".git/hooks");
    fs::create_dir_all(&hooks_dir).unwrap();
    fs::write(hooks_dir.join("pre-commit"), "#!/bin/sh\nexit 0\n").unwrap();

    env.githooks()
        .args(["install", "--single", "--non-interactive"])
        .assert()
        .success();

    let shim = fs::read_to_string(hooks_dir.join("pre-commit")).unwrap();
    assert!(shim.contains("# Base Git hook template from githooks"));
    assert!(hooks_dir.join("pre-commit.replaced.githook").is_file());
}

#[test]
fn installed_shims_run_hooks_on_commit() {
    let env = TestEnv::new();
    env.git(&["config", "--global", "githooks.autoupdate.enabled", "false"]);
    env.githooks()
        .args(["install", "--single", "--non-interactive"])
        .assert()
        .success();

    env.write_hook("pre-commit", "#!/bin/sh\necho 'blocked by hook' >&2\nexit 1\n");
    env.githooks().args(["accept", "pre-commit"]).assert().success();

    fs::write(env.root().join("change.txt"), "change\n").unwrap();
    env.git(&["add", "change.txt"]);

    let mut commit = std::process::Command::new("git");
    commit
        .args(["commit", "-q", "-m", "blocked"])
        .current_dir(&env.repo)
        .envs(env.isolation());
    assert_cmd::Command::from_std(commit)
        .assert()
        .failure()
        .stderr(predicate::str::contains("blocked by hook"));

    env.githooks().args(["disable", "pre-commit"]).assert().success();
    env.git(&["commit", "-q", "-m", "allowed"]);
}

/// Template install, then a bare repository created from that template.
fn bare_server_from_template(env: &TestEnv) -> std::path::PathBuf {
    env.git(&["config", "--global", "githooks.autoupdate.enabled", "false"]);
    let template = env.temp.path().join("template");
    env.githooks()
        .args(["install", "--non-interactive", "--template-dir"])
        .arg(&template)
        .assert()
        .success();

    let server = env.temp.path().join("server.git");
    env.git(&["init", "-q", "--bare", server.to_str().unwrap()]);
    let shim = fs::read_to_string(server.join("hooks/pre-receive")).unwrap();
    assert!(shim.contains("# Base Git hook template from githooks"));
    server
}

#[test]
fn push_into_bare_repository_without_hooks_succeeds() {
    let env = TestEnv::new();
    let server = bare_server_from_template(&env);

    env.git(&["push", "-q", server.to_str().unwrap(), "HEAD:refs/heads/main"]);

    let mut rev_parse = std::process::Command::new("git");
    rev_parse
        .args(["rev-parse", "--verify", "refs/heads/main"])
        .current_dir(&server)
        .envs(env.isolation());
    assert_cmd::Command::from_std(rev_parse).assert().success();
}

#[test]
fn bare_repository_hooks_can_reject_a_push() {
    let env = TestEnv::new();
    let server = bare_server_from_template(&env);
    crate::helpers::write_executable(
        &server.join(".githooks/pre-receive"),
        "#!/bin/sh\necho 'rejected by server hook' >&2\nexit 1\n",
    );
    let mut config = std::process::Command::new("git");
    config
        .args(["config", "githooks.autoaccept", "true"])
        .current_dir(&server)
        .envs(env.isolation());
    assert_cmd::Command::from_std(config).assert().success();

    let mut push = std::process::Command::new("git");
    push.args(["push", "-q", server.to_str().unwrap(), "HEAD:refs/heads/main"])
        .current_dir(&env.repo)
        .envs(env.isolation());
    assert_cmd::Command::from_std(push)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected by server hook"));
}

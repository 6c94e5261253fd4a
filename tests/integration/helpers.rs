//! Shared helpers for the integration tests
//!
//! Every test gets its own repository, global git config and shared hook
//! cache, so nothing leaks into the user's environment.

use assert_cmd::Command;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Output};
use tempfile::TempDir;

use githooks::fs::make_executable;

pub struct TestEnv {
    pub temp: TempDir,
    pub repo: PathBuf,
}

impl TestEnv {
    /// A fresh repository with one commit.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let repo = temp.path().join("repo");
        fs::create_dir_all(&repo).expect("Failed to create repo directory");
        fs::create_dir_all(temp.path().join("home")).expect("Failed to create home directory");
        fs::write(temp.path().join("gitconfig"), "").expect("Failed to write gitconfig");

        let env = Self { temp, repo };
        env.git(&["init", "-q"]);
        env.git(&["config", "user.email", "test@test.com"]);
        env.git(&["config", "user.name", "Test User"]);
        fs::write(env.repo.join("README.md"), "# Test Repository\n")
            .expect("Failed to write README.md");
        env.git(&["add", "."]);
        env.git(&["commit", "-q", "-m", "Initial commit"]);
        env
    }

    pub fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    pub fn global_config(&self) -> PathBuf {
        self.temp.path().join("gitconfig")
    }

    pub fn shared_dir(&self) -> PathBuf {
        self.temp.path().join("shared")
    }

    /// Environment every child process runs with.
    pub fn isolation(&self) -> Vec<(&'static str, OsString)> {
        vec![
            ("HOME", self.home().into_os_string()),
            ("GIT_CONFIG_GLOBAL", self.global_config().into_os_string()),
            ("GIT_CONFIG_NOSYSTEM", "1".into()),
            ("GITHOOKS_SHARED_DIR", self.shared_dir().into_os_string()),
            ("GITHOOKS_NON_INTERACTIVE", "1".into()),
        ]
    }

    fn isolate(&self, cmd: &mut StdCommand) {
        cmd.envs(self.isolation())
            .env_remove("GITHOOKS_DISABLE")
            .env_remove("GIT_TEMPLATE_DIR");
    }

    /// The githooks binary, run from the repository root.
    pub fn githooks(&self) -> Command {
        let mut cmd = Command::cargo_bin("githooks").unwrap();
        cmd.current_dir(&self.repo)
            .envs(self.isolation())
            .env_remove("GITHOOKS_DISABLE")
            .env_remove("GIT_TEMPLATE_DIR");
        cmd
    }

    /// Run git in the repository and insist it succeeds.
    pub fn git(&self, args: &[&str]) -> Output {
        let mut cmd = StdCommand::new("git");
        cmd.args(args).current_dir(&self.repo);
        self.isolate(&mut cmd);
        let output = cmd.output().expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Canonical repository root, as git reports it.
    pub fn root(&self) -> PathBuf {
        let out = self.git(&["rev-parse", "--show-toplevel"]);
        PathBuf::from(String::from_utf8_lossy(&out.stdout).trim())
    }

    /// Write an executable hook under `.githooks`.
    pub fn write_hook(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.root().join(".githooks").join(rel);
        write_executable(&path, body);
        path
    }

    pub fn ledger(&self) -> String {
        fs::read_to_string(self.root().join(".git/.githooks.checksum")).unwrap_or_default()
    }
}

pub fn write_executable(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().expect("hook path has a parent"))
        .expect("Failed to create hook directory");
    fs::write(path, body).expect("Failed to write hook");
    make_executable(path).expect("Failed to make hook executable");
}

/// A bare-bones repository holding hooks, usable as a shared hook source.
pub fn create_hook_source(dir: &Path, hooks: &[(&str, &str)]) {
    fs::create_dir_all(dir).expect("Failed to create hook source");
    for (rel, body) in hooks {
        write_executable(&dir.join(rel), body);
    }
    for args in [
        vec!["init", "-q"],
        vec!["add", "."],
        vec![
            "-c",
            "user.email=test@test.com",
            "-c",
            "user.name=Test User",
            "commit",
            "-q",
            "-m",
            "hooks",
        ],
    ] {
        let status = StdCommand::new("git")
            .args(&args)
            .current_dir(dir)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .status()
            .expect("Failed to run git");
        assert!(status.success(), "git {args:?} failed in hook source");
    }
}

//! Git command runner abstraction
//!
//! Every interaction with Git goes through the external `git` client.
//! These helpers give consistent error context and, for network-bound
//! commands, an explicit timeout.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for clone/pull of shared hook repositories.
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(300);

/// Run a git command and return the raw Output.
///
/// # Arguments
/// * `args` - Git command arguments (e.g., `&["config", "--get", "core.hooksPath"]`)
/// * `cwd` - Working directory for the git command
pub fn run_git(args: &[&str], cwd: &Path) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("Failed to execute: git {}", args.join(" ")))
}

/// Run a git command, check for success, and return stdout as a trimmed String.
pub fn run_git_checked(args: &[&str], cwd: &Path) -> Result<String> {
    let output = run_git(args, cwd)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let cmd = args.first().unwrap_or(&"");
        bail!("git {cmd} failed: {}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Outcome of a git command run under a deadline.
#[derive(Debug)]
pub struct TimedOutput {
    pub success: bool,
    pub timed_out: bool,
    /// Combined stdout and stderr, for diagnostics.
    pub output: String,
}

/// Run a git command, killing it once `timeout` elapses.
///
/// Output goes to anonymous temp files rather than pipes so a chatty
/// child can never block on a full pipe while we wait on it.
pub fn run_git_with_timeout(args: &[&str], cwd: &Path, timeout: Duration) -> Result<TimedOutput> {
    let mut capture = tempfile::tempfile().context("Failed to create capture file")?;
    let stderr = capture
        .try_clone()
        .context("Failed to duplicate capture file")?;

    let mut child = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(
            capture.try_clone().context("Failed to duplicate capture file")?,
        ))
        .stderr(Stdio::from(stderr))
        .env("GIT_TERMINAL_PROMPT", "0")
        .spawn()
        .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

    let (success, timed_out) = match child
        .wait_timeout(timeout)
        .context("Failed to wait for git")?
    {
        Some(status) => (status.success(), false),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            (false, true)
        }
    };

    Ok(TimedOutput {
        success,
        timed_out,
        output: read_capture(&mut capture)?,
    })
}

fn read_capture(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0))
        .context("Failed to rewind capture file")?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .context("Failed to read captured output")?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}

/// Fail early with a readable message when `git` is not on PATH.
pub fn check_git_available() -> Result<()> {
    which::which("git").context("git executable not found in PATH")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_git_checked_version() {
        let temp = TempDir::new().unwrap();
        let out = run_git_checked(&["--version"], temp.path()).unwrap();
        assert!(out.starts_with("git version"));
    }

    #[test]
    fn test_run_git_checked_reports_failure() {
        let temp = TempDir::new().unwrap();
        let err = run_git_checked(&["rev-parse", "--show-toplevel"], temp.path()).unwrap_err();
        assert!(err.to_string().contains("git rev-parse failed"));
    }

    #[test]
    fn test_run_git_with_timeout_captures_output() {
        let temp = TempDir::new().unwrap();
        let result =
            run_git_with_timeout(&["--version"], temp.path(), Duration::from_secs(30)).unwrap();
        assert!(result.success);
        assert!(!result.timed_out);
        assert!(result.output.contains("git version"));
    }

    #[test]
    fn test_run_git_with_timeout_failure_keeps_stderr() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let result = run_git_with_timeout(
            &["clone", missing.to_str().unwrap(), "target"],
            temp.path(),
            Duration::from_secs(30),
        )
        .unwrap();
        assert!(!result.success);
        assert!(!result.output.is_empty());
    }
}

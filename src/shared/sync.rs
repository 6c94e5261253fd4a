//! Clone or update shared hook repositories.
//!
//! Failures are collected, never raised: a broken remote must not stop the
//! remaining repositories from syncing or the Git command from finishing.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use super::SharedRepo;
use crate::git::runner::run_git_with_timeout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Updated,
    Failed { output: String },
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub results: Vec<(SharedRepo, SyncOutcome)>,
}

impl SyncReport {
    pub fn failures(&self) -> impl Iterator<Item = &(SharedRepo, SyncOutcome)> {
        self.results
            .iter()
            .filter(|(_, o)| matches!(o, SyncOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Sync every repository in `repos` into `shared_root`.
pub fn sync_all(repos: &[SharedRepo], shared_root: &Path, timeout: Duration) -> Result<SyncReport> {
    fs::create_dir_all(shared_root)
        .with_context(|| format!("Failed to create {}", shared_root.display()))?;

    let mut report = SyncReport::default();
    for repo in repos {
        let outcome = sync_one(repo, shared_root, timeout);
        if let SyncOutcome::Failed { output } = &outcome {
            eprintln!(
                "{} githooks: failed to sync shared hooks from {}",
                "⚠".yellow(),
                repo.url
            );
            for line in output.lines() {
                eprintln!("    {line}");
            }
        }
        report.results.push((repo.clone(), outcome));
    }
    Ok(report)
}

fn sync_one(repo: &SharedRepo, shared_root: &Path, timeout: Duration) -> SyncOutcome {
    let target = repo.clone_dir(shared_root);

    let (args, success_outcome): (Vec<&str>, SyncOutcome) = if repo.is_cloned(shared_root) {
        info!(url = %repo.url, dir = %target.display(), "updating shared hooks");
        (vec!["pull", "--ff-only"], SyncOutcome::Updated)
    } else {
        if target.exists() {
            // Leftover from an interrupted clone
            if let Err(e) = fs::remove_dir_all(&target) {
                return SyncOutcome::Failed {
                    output: format!("cannot clean {}: {e}", target.display()),
                };
            }
        }
        info!(url = %repo.url, dir = %target.display(), "cloning shared hooks");
        (
            vec!["clone", "--depth=1", repo.url.as_str(), repo.name.as_str()],
            SyncOutcome::Cloned,
        )
    };

    let cwd = if success_outcome == SyncOutcome::Updated {
        target.as_path()
    } else {
        shared_root
    };

    match run_git_with_timeout(&args, cwd, timeout) {
        Ok(out) if out.success => success_outcome,
        Ok(out) if out.timed_out => {
            warn!(url = %repo.url, "shared hook sync timed out");
            SyncOutcome::Failed {
                output: format!("timed out after {}s\n{}", timeout.as_secs(), out.output),
            }
        }
        Ok(out) => SyncOutcome::Failed { output: out.output },
        Err(e) => SyncOutcome::Failed {
            output: format!("{e:#}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn source_repo(dir: &Path) {
        fs::create_dir_all(dir.join("pre-commit")).unwrap();
        fs::write(dir.join("pre-commit/check"), "#!/bin/sh\nexit 0\n").unwrap();
        for args in [
            vec!["init", "-q"],
            vec!["add", "."],
            vec![
                "-c",
                "user.email=t@t",
                "-c",
                "user.name=t",
                "commit",
                "-q",
                "-m",
                "hooks",
            ],
        ] {
            let out = Command::new("git").args(&args).current_dir(dir).output().unwrap();
            assert!(out.status.success(), "git {args:?} failed");
        }
    }

    #[test]
    fn test_clone_then_update() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("remote/team/hooks");
        source_repo(&source);
        let cache = temp.path().join("cache");

        let repo = SharedRepo::new(source.to_str().unwrap());
        assert_eq!(repo.name, "team_hooks");

        let report = sync_all(&[repo.clone()], &cache, Duration::from_secs(60)).unwrap();
        assert_eq!(report.results[0].1, SyncOutcome::Cloned);
        assert!(cache.join("team_hooks/pre-commit/check").is_file());

        let report = sync_all(&[repo], &cache, Duration::from_secs(60)).unwrap();
        assert_eq!(report.results[0].1, SyncOutcome::Updated);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_failure_is_reported_not_raised() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does/not-exist");
        let ok_source = temp.path().join("remote/ok");
        source_repo(&ok_source);

        let repos = vec![
            SharedRepo::new(missing.to_str().unwrap()),
            SharedRepo::new(ok_source.to_str().unwrap()),
        ];
        let report = sync_all(&repos, &temp.path().join("cache"), Duration::from_secs(60)).unwrap();

        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.results[1].1, SyncOutcome::Cloned);
    }
}

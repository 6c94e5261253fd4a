//! shared add|remove|clear|list|update, pull

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use super::common::{open_store, try_current_repo};
use crate::config::ConfigStore;
use crate::engine::declared_shared;
use crate::git::runner::NETWORK_TIMEOUT;
use crate::git::RepoContext;
use crate::shared::{self, shared_root, sync_all, SharedRepo, SharedScope, SyncOutcome};

/// Scope selection shared by the `shared` subcommands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeFlags {
    pub global: bool,
    pub local: bool,
    pub all: bool,
}

impl ScopeFlags {
    /// A single scope; local unless `--global` was given.
    fn single(self) -> Result<SharedScope> {
        if self.global && self.local {
            bail!("Use either --global or --local, not both");
        }
        Ok(if self.global {
            SharedScope::Global
        } else {
            SharedScope::Local
        })
    }

    /// Scopes to show or clear; both when nothing or `--all` was given.
    fn many(self) -> Vec<SharedScope> {
        match (self.all, self.global, self.local) {
            (false, true, false) => vec![SharedScope::Global],
            (false, false, true) => vec![SharedScope::Local],
            _ => vec![SharedScope::Global, SharedScope::Local],
        }
    }
}

pub fn add(url: String, flags: ScopeFlags) -> Result<()> {
    let store = open_store();
    let repo = try_current_repo();
    let scope = flags.single()?;
    if shared::add(scope, &url, &store, repo.as_ref())? {
        println!("{} Added shared hook repository {}", "✓".green().bold(), url);
        println!("  {} Run `git hooks pull` to fetch it", "→".blue());
    } else {
        println!("{} {} is already listed", "·".dimmed(), url);
    }
    Ok(())
}

pub fn remove(url: String, flags: ScopeFlags) -> Result<()> {
    let store = open_store();
    let repo = try_current_repo();
    let scope = flags.single()?;
    if shared::remove(scope, &url, &store, repo.as_ref())? {
        println!("{} Removed shared hook repository {}", "✓".green().bold(), url);
    } else {
        bail!("{url} is not listed");
    }
    Ok(())
}

pub fn clear(flags: ScopeFlags) -> Result<()> {
    let store = open_store();
    let repo = try_current_repo();
    for scope in flags.many() {
        if scope == SharedScope::Local && repo.is_none() {
            if flags.local {
                bail!("Local shared hooks require a git repository");
            }
            continue;
        }
        shared::clear(scope, &store, repo.as_ref())?;
    }
    if flags.all {
        shared::purge_cache(&shared_root()?)?;
        println!("{} Shared hook cache removed", "✓".green().bold());
    }
    println!("{} Shared hook repositories cleared", "✓".green().bold());
    Ok(())
}

pub fn list(flags: ScopeFlags) -> Result<()> {
    let store = open_store();
    let repo = try_current_repo();
    let root = shared_root()?;
    for scope in flags.many() {
        let (title, repos) = match scope {
            SharedScope::Global => ("Global shared repositories", shared::global_repos(&store)?),
            SharedScope::Local => match &repo {
                Some(repo) => ("Local shared repositories", shared::local_repos(repo)?),
                None => continue,
            },
        };
        println!("{}", title.bold());
        print_repos(&repos, &root);
    }
    Ok(())
}

fn print_repos(repos: &[SharedRepo], root: &Path) {
    if repos.is_empty() {
        println!("  (none)");
        return;
    }
    for repo in repos {
        let status = if repo.is_cloned(root) {
            "cloned".green()
        } else {
            "missing".yellow()
        };
        println!("  - {} ({}) {}", repo.url, repo.name.dimmed(), status);
    }
}

/// Clone or update every declared shared repository.
pub fn pull() -> Result<()> {
    let store = open_store();
    let repo = try_current_repo();
    pull_with(&store, repo.as_ref(), &shared_root()?)
}

pub fn pull_with(store: &dyn ConfigStore, repo: Option<&RepoContext>, root: &Path) -> Result<()> {
    let repos = declared_shared(store, repo)?;
    if repos.is_empty() {
        println!("(no shared hook repositories configured)");
        return Ok(());
    }

    let report = sync_all(&repos, root, NETWORK_TIMEOUT)?;
    for (repo, outcome) in &report.results {
        match outcome {
            SyncOutcome::Cloned => println!("  {} cloned {}", "✓".green(), repo.url),
            SyncOutcome::Updated => println!("  {} updated {}", "✓".green(), repo.url),
            SyncOutcome::Failed { .. } => println!("  {} failed {}", "✗".red(), repo.url),
        }
    }
    let failed = report.failures().count();
    if failed > 0 {
        eprintln!(
            "{} {failed} shared hook repositories could not be synced",
            "⚠".yellow()
        );
    }
    Ok(())
}

//! Helpers shared by the command implementations.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::{keys, parse_bool, ConfigScope, ConfigStore, GitConfigStore};
use crate::engine::{select_provider, DecisionProvider};
use crate::git::RepoContext;
use crate::hooks::HookTarget;

/// Repository containing the current directory.
pub fn current_repo() -> Result<RepoContext> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(RepoContext::discover(&cwd)?)
}

/// Like [`current_repo`], but `None` outside a repository.
pub fn try_current_repo() -> Option<RepoContext> {
    let cwd = std::env::current_dir().ok()?;
    RepoContext::discover(&cwd).ok()
}

pub fn open_store() -> GitConfigStore {
    GitConfigStore::new()
}

/// Decision provider for this process, honouring `githooks.autoaccept`.
pub fn decisions_for(
    store: &dyn ConfigStore,
    repo: Option<&RepoContext>,
    force_non_interactive: bool,
) -> Result<Box<dyn DecisionProvider>> {
    let accept_new = match repo {
        Some(repo) => store.get_effective(&ConfigScope::Local(repo.root.clone()), keys::AUTO_ACCEPT)?,
        None => store.get(&ConfigScope::Global, keys::AUTO_ACCEPT)?,
    }
    .map(|v| parse_bool(&v))
    .unwrap_or(false);
    Ok(select_provider(force_non_interactive, accept_new))
}

/// Hook files named by `[trigger] [file]` arguments under the local hook root.
pub fn target_files(repo: &RepoContext, args: &[String]) -> Result<Vec<PathBuf>> {
    let target = HookTarget::resolve(&repo.hook_root(), args)?;
    let files = target.hook_files();
    if files.is_empty() {
        anyhow::bail!("No hook files found at {}", target.path.display());
    }
    Ok(files)
}

/// Path shown to users: relative to the repository root when possible.
pub fn display_path(repo: &RepoContext, path: &std::path::Path) -> String {
    path.strip_prefix(&repo.root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

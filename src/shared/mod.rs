//! Shared hook repositories
//!
//! Hooks can come from external repositories, declared globally in git
//! config (`githooks.shared`) or per repository in `.githooks/.shared`.
//! Each is cloned once into a cache directory keyed by a normalised name
//! and pulled on `post-merge` or an explicit `githooks pull`.

pub mod sync;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{env, keys, ConfigScope, ConfigStore};
use crate::error::HookError;
use crate::fs::read_list_file;
use crate::git::repo::HOOK_ROOT_DIR;
use crate::git::RepoContext;

pub use sync::{sync_all, SyncOutcome, SyncReport};

/// Which declaration list a shared repository came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedScope {
    Global,
    Local,
}

/// A declared shared hook repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedRepo {
    pub url: String,
    pub name: String,
}

impl SharedRepo {
    pub fn new(url: &str) -> Self {
        let url = url.trim().to_string();
        let name = normalize_name(&url);
        Self { url, name }
    }

    /// Cache location of the clone.
    pub fn clone_dir(&self, shared_root: &Path) -> PathBuf {
        shared_root.join(&self.name)
    }

    pub fn is_cloned(&self, shared_root: &Path) -> bool {
        self.clone_dir(shared_root).join(".git").exists()
    }

    /// Directory holding trigger hooks inside the clone: its `.githooks`
    /// directory when present, else the clone itself.
    pub fn hook_root(&self, shared_root: &Path) -> PathBuf {
        let clone = self.clone_dir(shared_root);
        let nested = clone.join(HOOK_ROOT_DIR);
        if nested.is_dir() {
            nested
        } else {
            clone
        }
    }
}

/// File-system safe cache name for a repository URL.
///
/// Scheme and host are dropped, the last two path segments are joined with
/// `_` after stripping a `.git` suffix, and every other non-alphanumeric
/// character becomes `_`:
/// `https://example.com/a.git` → `a`,
/// `git@github.com:org/hooks.git` → `org_hooks`.
pub fn normalize_name(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');

    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        rest.split_once('/').map(|(_, p)| p).unwrap_or("")
    } else {
        match trimmed.split_once(':') {
            Some((head, rest)) if !head.contains('/') && head.len() > 1 => rest,
            _ => trimmed,
        }
    };
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let tail = segments[segments.len().saturating_sub(2)..].join("_");
    let source = if tail.is_empty() { trimmed } else { tail.as_str() };

    source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Split config values on commas and newlines, dropping blanks and
/// duplicates while keeping order.
pub fn parse_url_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for value in values {
        for url in value.as_ref().split([',', '\n']) {
            let url = url.trim();
            if !url.is_empty() && !url.starts_with('#') && !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
    }
    urls
}

/// Root of the shared repository cache.
pub fn shared_root() -> Result<PathBuf, HookError> {
    if let Ok(dir) = std::env::var(env::SHARED_DIR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".githooks.shared"))
        .ok_or_else(|| HookError::EnvironmentMissing("Cannot find home directory".to_string()))
}

pub fn global_repos(store: &dyn ConfigStore) -> Result<Vec<SharedRepo>> {
    let values = store.get_all(&ConfigScope::Global, keys::SHARED)?;
    Ok(parse_url_list(&values)
        .iter()
        .map(|u| SharedRepo::new(u))
        .collect())
}

pub fn local_repos(repo: &RepoContext) -> Result<Vec<SharedRepo>> {
    let file = repo.local_shared_file();
    let lines = read_list_file(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(parse_url_list(&lines)
        .iter()
        .map(|u| SharedRepo::new(u))
        .collect())
}

/// Add `url` to a declaration list. Returns false when already present.
pub fn add(
    scope: SharedScope,
    url: &str,
    store: &dyn ConfigStore,
    repo: Option<&RepoContext>,
) -> Result<bool> {
    let url = url.trim();
    match scope {
        SharedScope::Global => {
            if global_repos(store)?.iter().any(|r| r.url == url) {
                return Ok(false);
            }
            store.add(&ConfigScope::Global, keys::SHARED, url)?;
        }
        SharedScope::Local => {
            let repo = require_repo(repo)?;
            if local_repos(repo)?.iter().any(|r| r.url == url) {
                return Ok(false);
            }
            let file = repo.local_shared_file();
            fs::create_dir_all(repo.hook_root())
                .with_context(|| format!("Failed to create {}", repo.hook_root().display()))?;
            let mut content = fs::read_to_string(&file).unwrap_or_default();
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(url);
            content.push('\n');
            fs::write(&file, content)
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
    }
    Ok(true)
}

/// Remove `url` from a declaration list. Returns false when absent.
pub fn remove(
    scope: SharedScope,
    url: &str,
    store: &dyn ConfigStore,
    repo: Option<&RepoContext>,
) -> Result<bool> {
    let url = url.trim();
    match scope {
        SharedScope::Global => {
            let current = global_repos(store)?;
            if !current.iter().any(|r| r.url == url) {
                return Ok(false);
            }
            store.unset(&ConfigScope::Global, keys::SHARED)?;
            for other in current.iter().filter(|r| r.url != url) {
                store.add(&ConfigScope::Global, keys::SHARED, &other.url)?;
            }
        }
        SharedScope::Local => {
            let repo = require_repo(repo)?;
            let file = repo.local_shared_file();
            let content = match fs::read_to_string(&file) {
                Ok(c) => c,
                Err(_) => return Ok(false),
            };
            let before = content.lines().count();
            let kept: Vec<&str> = content.lines().filter(|l| l.trim() != url).collect();
            if kept.len() == before {
                return Ok(false);
            }
            let mut rewritten = kept.join("\n");
            if !rewritten.is_empty() {
                rewritten.push('\n');
            }
            fs::write(&file, rewritten)
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
    }
    Ok(true)
}

/// Empty a declaration list.
pub fn clear(scope: SharedScope, store: &dyn ConfigStore, repo: Option<&RepoContext>) -> Result<()> {
    match scope {
        SharedScope::Global => store.unset(&ConfigScope::Global, keys::SHARED),
        SharedScope::Local => {
            let file = require_repo(repo)?.local_shared_file();
            if file.exists() {
                fs::write(&file, "")
                    .with_context(|| format!("Failed to write {}", file.display()))?;
            }
            Ok(())
        }
    }
}

/// Delete the whole shared repository cache.
pub fn purge_cache(shared_root: &Path) -> Result<()> {
    if shared_root.exists() {
        fs::remove_dir_all(shared_root)
            .with_context(|| format!("Failed to remove {}", shared_root.display()))?;
    }
    Ok(())
}

fn require_repo(repo: Option<&RepoContext>) -> Result<&RepoContext> {
    repo.ok_or_else(|| anyhow::anyhow!("Local shared hooks require a git repository"))
}

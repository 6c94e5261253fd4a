//! accept / disable / enable
//! Usage: githooks [accept|disable|enable] [--all] [trigger] [file]

use anyhow::Result;
use colored::Colorize;

use super::common::{current_repo, display_path, open_store, target_files};
use crate::config::{keys, ConfigScope, ConfigStore};
use crate::git::RepoContext;
use crate::hooks::ledger::hash_file;
use crate::hooks::ChecksumLedger;

/// Record the current content of the targeted hooks as accepted.
pub fn accept(args: Vec<String>) -> Result<()> {
    let repo = current_repo()?;
    accept_in(&repo, &args)
}

pub fn accept_in(repo: &RepoContext, args: &[String]) -> Result<()> {
    let mut ledger = ChecksumLedger::load(repo.ledger_path())?;
    for file in target_files(repo, args)? {
        let hash = hash_file(&file)?;
        if ledger.is_accepted(&file, &hash) {
            println!("  {} {} (already accepted)", "·".dimmed(), display_path(repo, &file));
            continue;
        }
        ledger.record_accepted(&file, &hash)?;
        println!("  {} accepted {}", "✓".green(), display_path(repo, &file));
    }
    Ok(())
}

/// Disable the targeted hooks, or every hook with `all`.
pub fn disable(args: Vec<String>, all: bool) -> Result<()> {
    let repo = current_repo()?;
    if all {
        return set_switch(&repo, &open_store(), true);
    }
    disable_in(&repo, &args)
}

pub fn disable_in(repo: &RepoContext, args: &[String]) -> Result<()> {
    let mut ledger = ChecksumLedger::load(repo.ledger_path())?;
    for file in target_files(repo, args)? {
        if ledger.is_disabled(&file) {
            println!("  {} {} (already disabled)", "·".dimmed(), display_path(repo, &file));
            continue;
        }
        ledger.record_disabled(&file)?;
        println!("  {} disabled {}", "✓".green(), display_path(repo, &file));
    }
    Ok(())
}

/// Enable the targeted hooks, or lift the repository-wide switch with `all`.
pub fn enable(args: Vec<String>, all: bool) -> Result<()> {
    let repo = current_repo()?;
    if all {
        return set_switch(&repo, &open_store(), false);
    }
    enable_in(&repo, &args)
}

pub fn enable_in(repo: &RepoContext, args: &[String]) -> Result<()> {
    let mut ledger = ChecksumLedger::load(repo.ledger_path())?;
    for file in target_files(repo, args)? {
        if ledger.clear_disabled(&file)? {
            println!("  {} enabled {}", "✓".green(), display_path(repo, &file));
        } else {
            println!("  {} {} (already enabled)", "·".dimmed(), display_path(repo, &file));
        }
    }
    Ok(())
}

/// Turn the repository-wide disable switch on or off.
pub fn set_switch(repo: &RepoContext, store: &dyn ConfigStore, disabled: bool) -> Result<()> {
    let scope = ConfigScope::Local(repo.root.clone());
    if disabled {
        store.set(&scope, keys::DISABLE, "true")?;
        println!("{} All githooks disabled in {}", "✓".green().bold(), repo.root.display());
    } else {
        store.unset(&scope, keys::DISABLE)?;
        println!("{} githooks enabled in {}", "✓".green().bold(), repo.root.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::hooks::HookState;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_hooks() -> (TempDir, RepoContext) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        fs::create_dir_all(root.join(".git")).unwrap();
        for name in ["lint", "format"] {
            let path = root.join(".githooks/pre-commit").join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!("#!/bin/sh\necho {name}\n")).unwrap();
        }
        let repo = RepoContext::from_parts(&root, root.join(".git"));
        (temp, repo)
    }

    fn state(repo: &RepoContext, rel: &str) -> HookState {
        let path = repo.hook_root().join(rel);
        let ledger = ChecksumLedger::load(repo.ledger_path()).unwrap();
        ledger.classify(&path, &hash_file(&path).unwrap())
    }

    #[test]
    fn test_accept_trigger_directory() {
        let (_temp, repo) = repo_with_hooks();
        accept_in(&repo, &["pre-commit".into()]).unwrap();
        assert_eq!(state(&repo, "pre-commit/lint"), HookState::Active);
        assert_eq!(state(&repo, "pre-commit/format"), HookState::Active);

        // Accepting again appends nothing
        let before = fs::read_to_string(repo.ledger_path()).unwrap();
        accept_in(&repo, &["pre-commit".into()]).unwrap();
        assert_eq!(fs::read_to_string(repo.ledger_path()).unwrap(), before);
    }

    #[test]
    fn test_disable_enable_round_trip() {
        let (_temp, repo) = repo_with_hooks();
        accept_in(&repo, &["pre-commit".into(), "lint".into()]).unwrap();

        disable_in(&repo, &["pre-commit".into(), "lint".into()]).unwrap();
        assert_eq!(state(&repo, "pre-commit/lint"), HookState::Disabled);

        enable_in(&repo, &["pre-commit".into(), "lint".into()]).unwrap();
        assert_eq!(state(&repo, "pre-commit/lint"), HookState::Active);
        assert_eq!(state(&repo, "pre-commit/format"), HookState::PendingNew);
    }

    #[test]
    fn test_enable_on_enabled_leaves_ledger_untouched() {
        let (_temp, repo) = repo_with_hooks();
        accept_in(&repo, &["format".into()]).unwrap();
        let before = fs::read_to_string(repo.ledger_path()).unwrap();
        enable_in(&repo, &["format".into()]).unwrap();
        assert_eq!(fs::read_to_string(repo.ledger_path()).unwrap(), before);
    }

    #[test]
    fn test_unknown_target_fails() {
        let (_temp, repo) = repo_with_hooks();
        assert!(accept_in(&repo, &["nothing-here".into()]).is_err());
    }

    #[test]
    fn test_switch() {
        let (_temp, repo) = repo_with_hooks();
        let store = MemoryConfigStore::new();
        let scope = ConfigScope::Local(repo.root.clone());
        set_switch(&repo, &store, true).unwrap();
        assert!(store.get_bool(&scope, keys::DISABLE).unwrap());
        set_switch(&repo, &store, false).unwrap();
        assert!(!store.get_bool(&scope, keys::DISABLE).unwrap());
    }
}

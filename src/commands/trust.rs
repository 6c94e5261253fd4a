//! trust [revoke|delete|forget]

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

use super::common::{current_repo, open_store};
use crate::config::ConfigStore;
use crate::git::RepoContext;
use crate::hooks::TrustState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustAction {
    /// Create the marker and trust all hooks.
    Grant,
    /// Keep the marker, stop trusting.
    Revoke,
    /// Remove the marker and stop trusting.
    Delete,
    /// Drop the recorded answer; the next hook run asks again.
    Forget,
}

pub fn execute(action: TrustAction) -> Result<()> {
    let repo = current_repo()?;
    apply(&repo, &open_store(), action)
}

pub fn apply(repo: &RepoContext, store: &dyn ConfigStore, action: TrustAction) -> Result<()> {
    let marker = repo.trust_marker();
    match action {
        TrustAction::Grant => {
            if !marker.exists() {
                fs::create_dir_all(repo.hook_root())
                    .with_context(|| format!("Failed to create {}", repo.hook_root().display()))?;
                fs::write(&marker, "")
                    .with_context(|| format!("Failed to create {}", marker.display()))?;
            }
            TrustState::record(repo, store, true)?;
            println!("{} All hooks in this repository are trusted", "✓".green().bold());
            println!(
                "  {} Commit {} to ask everyone else to trust them too",
                "→".blue(),
                marker.display()
            );
        }
        TrustAction::Revoke => {
            TrustState::record(repo, store, false)?;
            println!("{} Trust revoked, hooks need to be accepted again", "✓".green().bold());
        }
        TrustAction::Delete => {
            if marker.exists() {
                fs::remove_file(&marker)
                    .with_context(|| format!("Failed to remove {}", marker.display()))?;
            }
            TrustState::record(repo, store, false)?;
            println!("{} Trust marker deleted", "✓".green().bold());
        }
        TrustAction::Forget => {
            TrustState::forget(repo, store)?;
            println!("{} Trust decision forgotten", "✓".green().bold());
        }
    }
    Ok(())
}

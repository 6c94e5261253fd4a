//! update [force|enable|disable]

use anyhow::Result;
use colored::Colorize;

use super::common::{decisions_for, open_store, try_current_repo};
use crate::config::ConfigScope;
use crate::update::{
    is_single_install, run_installer, set_enabled, HttpFetcher, UpdateChecker, UpdateStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    Check,
    Force,
    Enable,
    Disable,
}

pub fn execute(action: UpdateAction) -> Result<()> {
    let store = open_store();
    match action {
        UpdateAction::Enable => {
            set_enabled(&store, true)?;
            println!("{} Automatic update checks enabled", "✓".green().bold());
            return Ok(());
        }
        UpdateAction::Disable => {
            set_enabled(&store, false)?;
            println!("{} Automatic update checks disabled", "✓".green().bold());
            return Ok(());
        }
        UpdateAction::Check | UpdateAction::Force => {}
    }

    let repo = try_current_repo();
    let scope = repo.as_ref().map(|r| ConfigScope::Local(r.root.clone()));
    let single = is_single_install(&store, scope.as_ref())?;
    let decisions = decisions_for(&store, repo.as_ref(), false)?;

    println!("{}", "Checking for updates...".blue());
    let fetcher = HttpFetcher;
    let check = UpdateChecker::new(&store, &fetcher).check()?;

    match &check.status {
        UpdateStatus::UpToDate { current } if action != UpdateAction::Force => {
            println!(
                "{} You're running the latest version ({current})",
                "✓".green().bold()
            );
            return Ok(());
        }
        UpdateStatus::UpToDate { current } => {
            println!("Reinstalling version {current}");
        }
        UpdateStatus::Available { current, latest } => {
            println!(
                "New version available: {} → {}",
                current.dimmed(),
                latest.green().bold()
            );
            if action != UpdateAction::Force && !decisions.decide_update(current, latest)? {
                println!("{} Update skipped", "·".dimmed());
                return Ok(());
            }
        }
    }

    run_installer(&check.script, single)?;
    println!("{} Update finished", "✓".green().bold());
    Ok(())
}

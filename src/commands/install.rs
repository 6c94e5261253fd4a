//! install [--dry-run] [--non-interactive] [--single] [--template-dir DIR]

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use super::common::{decisions_for, open_store, try_current_repo};
use crate::git::runner::check_git_available;
use crate::install::{apply, plan, InstallOptions};

pub fn execute(
    dry_run: bool,
    non_interactive: bool,
    single: bool,
    template_dir: Option<PathBuf>,
) -> Result<()> {
    check_git_available()?;
    let binary = std::env::current_exe().context("Failed to get current executable path")?;
    let options = InstallOptions {
        dry_run,
        non_interactive,
        single,
        template_dir,
        binary,
    };

    let store = open_store();
    let repo = try_current_repo();
    let decisions = decisions_for(&store, repo.as_ref(), non_interactive)?;
    let actions = plan(&options, &store, repo.as_ref(), decisions.as_ref())?;

    if options.dry_run {
        println!("{}", "Dry run, nothing will be changed:".blue());
        for action in &actions {
            println!("  {} {action}", "→".blue());
        }
        return Ok(());
    }

    println!("{}", "Installing githooks...".blue());
    apply(&actions, &options.binary, &store)?;
    println!(
        "{} Installed {} action(s)",
        "✓".green().bold(),
        actions.len()
    );
    if let Some(repo) = &repo {
        println!("  {} Hooks active in {}", "→".blue(), repo.root.display());
    }
    println!("  {} Run `git hooks help` to get started", "→".blue());
    Ok(())
}

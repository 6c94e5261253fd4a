//! readme [add|update]

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use super::common::current_repo;
use crate::git::RepoContext;
use crate::install::README;

pub fn execute(overwrite: bool) -> Result<()> {
    let repo = current_repo()?;
    let path = write(&repo, overwrite)?;
    println!("{} Wrote {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Write `.githooks/README.md`; without `overwrite` an existing file is an error.
pub fn write(repo: &RepoContext, overwrite: bool) -> Result<PathBuf> {
    let path = repo.hook_root().join("README.md");
    if path.exists() && !overwrite {
        bail!(
            "{} already exists, use `git hooks readme update` to replace it",
            path.display()
        );
    }
    fs::create_dir_all(repo.hook_root())
        .with_context(|| format!("Failed to create {}", repo.hook_root().display()))?;
    fs::write(&path, README).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_then_update() {
        let temp = TempDir::new().unwrap();
        let repo = RepoContext::from_parts(temp.path(), temp.path().join(".git"));

        let path = write(&repo, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), README);

        fs::write(&path, "stale").unwrap();
        assert!(write(&repo, false).is_err());
        write(&repo, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), README);
    }
}

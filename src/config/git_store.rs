use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ConfigScope, ConfigStore};
use crate::git::runner::run_git;

/// Exit code `git config` uses for "key not found".
const GIT_CONFIG_MISSING: i32 = 1;
/// Exit code `git config --unset` uses when nothing matched.
const GIT_CONFIG_NOTHING_TO_UNSET: i32 = 5;

/// Store backed by `git config`.
#[derive(Debug, Clone, Default)]
pub struct GitConfigStore {
    /// Use this file instead of the user's global config.
    global_file: Option<PathBuf>,
}

impl GitConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirect the global scope to a standalone config file.
    pub fn with_global_file(path: impl Into<PathBuf>) -> Self {
        Self {
            global_file: Some(path.into()),
        }
    }

    fn scope_args(&self, scope: &ConfigScope) -> (Vec<String>, PathBuf) {
        match scope {
            ConfigScope::Global => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                match &self.global_file {
                    Some(file) => (
                        vec!["--file".to_string(), file.to_string_lossy().to_string()],
                        cwd,
                    ),
                    None => (vec!["--global".to_string()], cwd),
                }
            }
            ConfigScope::Local(root) => (vec!["--local".to_string()], root.clone()),
        }
    }

    fn run(&self, scope: &ConfigScope, args: &[&str]) -> Result<(i32, String, String)> {
        let (mut full, cwd) = self.scope_args(scope);
        full.extend(args.iter().map(|s| s.to_string()));
        full.insert(0, "config".to_string());
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let output = run_git(&refs, Path::new(&cwd))?;
        let code = output.status.code().unwrap_or(-1);
        debug!(args = ?refs, code, "git config");
        Ok((
            code,
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

impl ConfigStore for GitConfigStore {
    fn get(&self, scope: &ConfigScope, key: &str) -> Result<Option<String>> {
        let (code, stdout, stderr) = self.run(scope, &["--get", key])?;
        match code {
            0 => Ok(Some(stdout.trim().to_string())),
            GIT_CONFIG_MISSING => Ok(None),
            // Several values set: fall back to the last one.
            2 => Ok(self.get_all(scope, key)?.pop()),
            _ => bail!("git config --get {key} failed: {stderr}"),
        }
    }

    fn get_all(&self, scope: &ConfigScope, key: &str) -> Result<Vec<String>> {
        let (code, stdout, stderr) = self.run(scope, &["--get-all", key])?;
        match code {
            0 => Ok(stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect()),
            GIT_CONFIG_MISSING => Ok(Vec::new()),
            _ => bail!("git config --get-all {key} failed: {stderr}"),
        }
    }

    fn set(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()> {
        let (code, _, stderr) = self.run(scope, &["--replace-all", key, value])?;
        if code != 0 {
            bail!("git config {key} failed: {stderr}");
        }
        Ok(())
    }

    fn add(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()> {
        let (code, _, stderr) = self.run(scope, &["--add", key, value])?;
        if code != 0 {
            bail!("git config --add {key} failed: {stderr}");
        }
        Ok(())
    }

    fn unset(&self, scope: &ConfigScope, key: &str) -> Result<()> {
        let (code, _, stderr) = self.run(scope, &["--unset-all", key])?;
        match code {
            0 | GIT_CONFIG_NOTHING_TO_UNSET => Ok(()),
            _ => bail!("git config --unset-all {key} failed: {stderr}"),
        }
    }
}

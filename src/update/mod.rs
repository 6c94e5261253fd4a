//! Self-update
//!
//! The install script published upstream carries a `# Version:` line. An
//! update check fetches it, compares that token with ours and, when newer
//! and the user agrees, pipes the script into `sh`. Automatic checks run
//! at most once a day after a successful `post-commit`.

pub(crate) mod client;
pub mod version;

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::{keys, parse_bool, ConfigScope, ConfigStore};
use crate::engine::DecisionProvider;
use crate::error::{HookError, Result};

pub use version::{extract_version, version_line, NumericVersionComparator, VersionComparator};

pub const DEFAULT_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/githooks-rs/githooks/main/install.sh";
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum time between automatic checks.
pub const CHECK_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Source of the install script.
pub trait ScriptFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches over HTTPS. Any failure is a [`HookError::Network`].
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl ScriptFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        client::fetch_text(url).map_err(|e| HookError::Network(format!("{e:#}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate { current: String },
    Available { current: String, latest: String },
}

/// Result of fetching and inspecting the install script.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    pub status: UpdateStatus,
    pub script: String,
}

pub fn is_enabled(store: &dyn ConfigStore) -> Result<bool> {
    Ok(store.get_bool(&ConfigScope::Global, keys::AUTOUPDATE_ENABLED)?)
}

pub fn set_enabled(store: &dyn ConfigStore, enabled: bool) -> Result<()> {
    store.set(
        &ConfigScope::Global,
        keys::AUTOUPDATE_ENABLED,
        if enabled { "true" } else { "false" },
    )?;
    Ok(())
}

/// Whether a day has passed since the last recorded check.
pub fn is_due(store: &dyn ConfigStore, now: DateTime<Utc>) -> Result<bool> {
    let last = store
        .get(&ConfigScope::Global, keys::AUTOUPDATE_LAST_RUN)?
        .and_then(|v| v.trim().parse::<i64>().ok());
    Ok(match last {
        Some(last) => now.timestamp() - last >= CHECK_INTERVAL_SECS,
        None => true,
    })
}

pub fn record_run(store: &dyn ConfigStore, now: DateTime<Utc>) -> Result<()> {
    store.set(
        &ConfigScope::Global,
        keys::AUTOUPDATE_LAST_RUN,
        &now.timestamp().to_string(),
    )?;
    Ok(())
}

pub fn script_url(store: &dyn ConfigStore) -> Result<String> {
    Ok(store
        .get(&ConfigScope::Global, keys::AUTOUPDATE_URL)?
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SCRIPT_URL.to_string()))
}

/// Whether the repository was installed in single-repository mode.
pub fn is_single_install(store: &dyn ConfigStore, scope: Option<&ConfigScope>) -> Result<bool> {
    match scope {
        Some(scope) => Ok(store
            .get(scope, keys::SINGLE_INSTALL)?
            .map(|v| parse_bool(&v))
            .unwrap_or(false)),
        None => Ok(false),
    }
}

pub struct UpdateChecker<'a> {
    store: &'a dyn ConfigStore,
    fetcher: &'a dyn ScriptFetcher,
    comparator: Box<dyn VersionComparator>,
    current: String,
}

impl<'a> UpdateChecker<'a> {
    pub fn new(store: &'a dyn ConfigStore, fetcher: &'a dyn ScriptFetcher) -> Self {
        Self {
            store,
            fetcher,
            comparator: Box::new(NumericVersionComparator),
            current: CURRENT_VERSION.to_string(),
        }
    }

    pub fn with_comparator(mut self, comparator: Box<dyn VersionComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current = version.into();
        self
    }

    /// Fetch the install script and compare its version with ours.
    pub fn check(&self) -> Result<UpdateCheck> {
        let url = script_url(self.store)?;
        debug!(url, "fetching install script");
        let script = self.fetcher.fetch(&url)?;
        let latest = extract_version(&script).ok_or_else(|| {
            HookError::Network(format!("no version line found in script from {url}"))
        })?;

        let status = if self.comparator.is_newer(&self.current, &latest) {
            UpdateStatus::Available {
                current: self.current.clone(),
                latest,
            }
        } else {
            UpdateStatus::UpToDate {
                current: self.current.clone(),
            }
        };
        Ok(UpdateCheck { status, script })
    }

    /// The once-a-day check run after `post-commit`.
    ///
    /// Returns whether the installer ran. Does nothing when automatic
    /// updates are off or the last check is less than a day old.
    pub fn run_periodic(
        &self,
        decisions: &dyn DecisionProvider,
        single: bool,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !is_enabled(self.store)? || !is_due(self.store, now)? {
            return Ok(false);
        }
        record_run(self.store, now)?;

        let check = self.check()?;
        let UpdateStatus::Available { current, latest } = &check.status else {
            debug!("githooks is up to date");
            return Ok(false);
        };
        if !decisions.decide_update(current, latest)? {
            info!(latest = %latest, "update declined");
            if !decisions.is_interactive() {
                eprintln!(
                    "{} githooks: version {latest} is available, run `git hooks update` to install it",
                    "→".blue()
                );
            }
            return Ok(false);
        }
        run_installer(&check.script, single)?;
        Ok(true)
    }
}

/// Pipe `script` into `sh -s -- [--single]`.
pub fn run_installer(script: &str, single: bool) -> Result<()> {
    let checksum = client::compute_sha256_checksum(script.as_bytes());
    info!(sha256 = %checksum, single, "running install script");
    println!("  {} SHA-256: {}", "ℹ".blue(), checksum.dimmed());

    let mut cmd = Command::new("sh");
    cmd.args(["-s", "--"]);
    if single {
        cmd.arg("--single");
    }
    let mut child = cmd
        .stdin(Stdio::piped())
        .spawn()
        .context("Failed to start install script")?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .context("Failed to pass install script to sh")?;
    }
    let status = child.wait().context("Failed to wait for install script")?;
    if !status.success() {
        return Err(HookError::Other(anyhow::anyhow!(
            "install script exited with {}",
            status.code().unwrap_or(1)
        )));
    }
    Ok(())
}

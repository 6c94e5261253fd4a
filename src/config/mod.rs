//! Configuration store for githooks settings
//!
//! Git configuration is the persistent home of every switch the hook
//! manager reads (trust, disable, shared repositories, auto-update).
//! Access goes through the [`ConfigStore`] trait so the engine can be
//! driven by an in-memory store in tests and dry runs.

pub mod git_store;
pub mod memory;

use anyhow::Result;
use std::path::PathBuf;

pub use git_store::GitConfigStore;
pub use memory::MemoryConfigStore;

/// Configuration keys
pub mod keys {
    pub const DISABLE: &str = "githooks.disable";
    pub const TRUST_ALL: &str = "githooks.trust.all";
    pub const SHARED: &str = "githooks.shared";
    pub const AUTOUPDATE_ENABLED: &str = "githooks.autoupdate.enabled";
    pub const AUTOUPDATE_LAST_RUN: &str = "githooks.autoupdate.lastrun";
    pub const AUTOUPDATE_URL: &str = "githooks.autoupdate.url";
    pub const SINGLE_INSTALL: &str = "githooks.single.install";
    pub const AUTO_ACCEPT: &str = "githooks.autoaccept";
    pub const FAIL_ON_MISSING_SHARED: &str = "githooks.failOnNonExistingSharedHooks";
}

/// Environment overrides
pub mod env {
    pub const DISABLE: &str = "GITHOOKS_DISABLE";
    pub const NON_INTERACTIVE: &str = "GITHOOKS_NON_INTERACTIVE";
    pub const SHARED_DIR: &str = "GITHOOKS_SHARED_DIR";
    pub const LOG: &str = "GITHOOKS_LOG";
}

/// Where a configuration value lives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    Global,
    /// Repository-local configuration, keyed by repository root.
    Local(PathBuf),
}

pub trait ConfigStore {
    /// Last value of `key`, if set.
    fn get(&self, scope: &ConfigScope, key: &str) -> Result<Option<String>>;

    /// Every value of a multi-value `key`, in definition order.
    fn get_all(&self, scope: &ConfigScope, key: &str) -> Result<Vec<String>>;

    /// Replace all values of `key` with `value`.
    fn set(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Append another value to a multi-value `key`.
    fn add(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Remove every value of `key`. Unsetting a missing key is not an error.
    fn unset(&self, scope: &ConfigScope, key: &str) -> Result<()>;

    /// Read `key` as a boolean; missing means `false`.
    fn get_bool(&self, scope: &ConfigScope, key: &str) -> Result<bool> {
        Ok(self
            .get(scope, key)?
            .map(|v| parse_bool(&v))
            .unwrap_or(false))
    }

    /// Local value first, then global.
    fn get_effective(&self, repo_scope: &ConfigScope, key: &str) -> Result<Option<String>> {
        match self.get(repo_scope, key)? {
            Some(value) => Ok(Some(value)),
            None => self.get(&ConfigScope::Global, key),
        }
    }
}

/// Lenient boolean parsing shared by config and environment values.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}

/// True when the environment variable is set to anything non-empty.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

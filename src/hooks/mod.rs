//! Hook files and the decisions made about them
//!
//! - [`ledger`]: append-only record of accepted and disabled hook files
//! - [`ignore`]: glob patterns that exclude hook files
//! - [`trust`]: repository-wide "trust all hooks" state
//! - [`resolve`]: finding hook files for a trigger or a user-supplied target

pub mod ignore;
pub mod ledger;
pub mod resolve;
pub mod trust;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub use ignore::IgnoreFilter;
pub use ledger::{ChecksumLedger, EntryState, LedgerEntry};
pub use resolve::{hooks_in, HookTarget};
pub use trust::TrustState;

/// Every Git trigger a hook shim is installed for.
pub const TRIGGERS: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
];

/// Triggers for which Git writes data to the hook's stdin.
pub const STDIN_TRIGGERS: &[&str] = &[
    "pre-push",
    "pre-receive",
    "post-receive",
    "post-rewrite",
    "reference-transaction",
];

pub fn is_trigger(name: &str) -> bool {
    TRIGGERS.contains(&name)
}

/// Where a hook file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookSource {
    Local,
    SharedGlobal,
    SharedLocal,
    Replaced,
}

impl fmt::Display for HookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::SharedGlobal => write!(f, "shared:global"),
            Self::SharedLocal => write!(f, "shared:local"),
            Self::Replaced => write!(f, "replaced"),
        }
    }
}

/// A hook file discovered for one invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFile {
    pub path: PathBuf,
    pub trigger: String,
    pub executable: bool,
    pub source: HookSource,
    /// Root the ignore files for this hook are read from.
    pub hook_root: PathBuf,
}

impl HookFile {
    pub fn new(path: PathBuf, trigger: &str, source: HookSource, hook_root: &Path) -> Self {
        let executable = crate::fs::is_executable(&path);
        Self {
            path,
            trigger: trigger.to_string(),
            executable,
            source,
            hook_root: hook_root.to_path_buf(),
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Display state of a hook file, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookState {
    Ignored,
    Disabled,
    PendingNew,
    PendingChanged,
    Active,
    ActiveTrusted,
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ignored => "ignored",
            Self::Disabled => "disabled",
            Self::PendingNew => "pending / new",
            Self::PendingChanged => "pending / changed",
            Self::Active => "active",
            Self::ActiveTrusted => "active / trusted",
        };
        f.write_str(label)
    }
}

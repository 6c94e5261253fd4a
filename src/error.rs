//! Error taxonomy for hook processing.
//!
//! Commands work with `anyhow::Result`; the engine and its collaborators
//! return [`HookError`] so callers can tell a failing hook from a broken
//! environment or an unreachable network. A declined hook is not an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    /// A hook file exited non-zero.
    #[error("hook '{}' failed with exit code {code}", path.display())]
    HookFailed { path: PathBuf, code: i32 },

    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("{0}")]
    EnvironmentMissing(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to write ledger '{}': {source}", path.display())]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    /// Exit code surfaced to Git for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HookFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Whether this error should abort the enclosing Git operation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

use std::path::{Path, PathBuf};

use crate::error::{HookError, Result};
use crate::git::runner::run_git_checked;

/// Name of the per-repository hook directory.
pub const HOOK_ROOT_DIR: &str = ".githooks";
/// Ledger file name, stored inside the git directory.
pub const LEDGER_FILE: &str = ".githooks.checksum";
/// Presence of this file in the hook root asks users to trust all hooks.
pub const TRUST_MARKER: &str = "trust-all";
/// Local list of shared hook repositories.
pub const LOCAL_SHARED_FILE: &str = ".shared";

/// Paths of one repository as seen by the hook manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub root: PathBuf,
    pub git_dir: PathBuf,
    /// Where Git looks for hook executables (honours `core.hooksPath`).
    pub hooks_dir: PathBuf,
}

impl RepoContext {
    /// Locate the repository containing `path`.
    ///
    /// A bare repository has no work tree; its git directory doubles as the
    /// root, so `.githooks` and the ledger live inside it.
    pub fn discover(path: &Path) -> Result<Self> {
        let not_a_repo = || HookError::NotARepository(path.to_path_buf());
        let git_dir = rev_parse(path, "--absolute-git-dir")
            .map(PathBuf::from)
            .ok_or_else(not_a_repo)?;
        let bare = rev_parse(path, "--is-bare-repository").as_deref() == Some("true");
        let root = if bare {
            git_dir.clone()
        } else {
            rev_parse(path, "--show-toplevel")
                .map(PathBuf::from)
                .ok_or_else(not_a_repo)?
        };

        let hooks_dir = match config_hooks_path(&root) {
            Some(configured) => {
                let configured = PathBuf::from(configured);
                if configured.is_absolute() {
                    configured
                } else {
                    root.join(configured)
                }
            }
            None => git_dir.join("hooks"),
        };

        Ok(Self {
            root,
            git_dir,
            hooks_dir,
        })
    }

    /// Build a context from known paths without asking git.
    pub fn from_parts(root: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Self {
        let git_dir = git_dir.into();
        Self {
            root: root.into(),
            hooks_dir: git_dir.join("hooks"),
            git_dir,
        }
    }

    pub fn hook_root(&self) -> PathBuf {
        self.root.join(HOOK_ROOT_DIR)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.git_dir.join(LEDGER_FILE)
    }

    pub fn trust_marker(&self) -> PathBuf {
        self.hook_root().join(TRUST_MARKER)
    }

    pub fn local_shared_file(&self) -> PathBuf {
        self.hook_root().join(LOCAL_SHARED_FILE)
    }

    /// The hook that was in place before installation, if any.
    pub fn replaced_hook(&self, trigger: &str) -> PathBuf {
        self.hooks_dir.join(format!("{trigger}.replaced.githook"))
    }
}

fn rev_parse(path: &Path, flag: &str) -> Option<String> {
    run_git_checked(&["rev-parse", flag], path)
        .ok()
        .filter(|value| !value.is_empty())
}

fn config_hooks_path(root: &Path) -> Option<String> {
    run_git_checked(&["config", "--get", "core.hooksPath"], root)
        .ok()
        .filter(|value| !value.is_empty())
}

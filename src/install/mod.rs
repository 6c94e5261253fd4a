//! Installing hook shims
//!
//! Every supported trigger gets a small shell shim that execs
//! `githooks run <trigger>`. Shims go into Git's template directory, so new
//! clones pick them up, and into the current repository. Installation is
//! planned as a list of [`InstallAction`]s first so `--dry-run` can print
//! the exact plan without touching anything.

pub mod template;

use anyhow::Context;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{keys, ConfigScope, ConfigStore};
use crate::engine::DecisionProvider;
use crate::error::{HookError, Result};
use crate::fs::make_executable;
use crate::git::repo::RepoContext;
use crate::hooks::TRIGGERS;
use crate::update::CURRENT_VERSION;

pub use template::{is_shim, render_shim, README, SHIM_MARKER};

/// Git's built-in template directory on most distributions.
pub const DEFAULT_TEMPLATE_DIR: &str = "/usr/share/git-core/templates";
/// Environment variable Git reads its template directory from.
pub const GIT_TEMPLATE_DIR_ENV: &str = "GIT_TEMPLATE_DIR";
pub const TEMPLATE_DIR_KEY: &str = "init.templateDir";
pub const ALIAS_KEY: &str = "alias.hooks";
pub const ALIAS_VALUE: &str = "!githooks";

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    pub non_interactive: bool,
    /// Install into the current repository only, leaving templates alone.
    pub single: bool,
    pub template_dir: Option<PathBuf>,
    /// Program the shims exec.
    pub binary: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    CreateDir(PathBuf),
    /// Keep a foreign hook as `<trigger>.replaced.githook`.
    MoveLegacy { from: PathBuf, to: PathBuf },
    WriteShim { path: PathBuf, trigger: String },
    SetConfig {
        scope: ConfigScope,
        key: String,
        value: String,
    },
}

impl fmt::Display for InstallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(path) => write!(f, "create directory {}", path.display()),
            Self::MoveLegacy { from, to } => {
                write!(f, "move {} to {}", from.display(), to.display())
            }
            Self::WriteShim { path, .. } => write!(f, "write hook {}", path.display()),
            Self::SetConfig { scope, key, value } => {
                let scope = match scope {
                    ConfigScope::Global => "global",
                    ConfigScope::Local(_) => "local",
                };
                write!(f, "set {scope} config {key} = {value}")
            }
        }
    }
}

/// Where the template directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Explicit,
    Environment,
    GitConfig,
    Default,
}

/// Pick Git's template directory.
///
/// Order: `explicit`, `$GIT_TEMPLATE_DIR`, `init.templateDir`, then the
/// distribution default when it exists.
pub fn find_template_dir(
    explicit: Option<&Path>,
    store: &dyn ConfigStore,
) -> Result<(PathBuf, TemplateSource)> {
    if let Some(dir) = explicit {
        return Ok((dir.to_path_buf(), TemplateSource::Explicit));
    }
    if let Ok(dir) = std::env::var(GIT_TEMPLATE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok((PathBuf::from(dir), TemplateSource::Environment));
        }
    }
    if let Some(dir) = store.get(&ConfigScope::Global, TEMPLATE_DIR_KEY)? {
        if !dir.trim().is_empty() {
            return Ok((expand_home(dir.trim()), TemplateSource::GitConfig));
        }
    }
    let default = PathBuf::from(DEFAULT_TEMPLATE_DIR);
    if default.is_dir() {
        return Ok((default, TemplateSource::Default));
    }
    Err(HookError::EnvironmentMissing(
        "Git hook template directory not found, pass --template-dir".to_string(),
    ))
}

fn expand_home(dir: &str) -> PathBuf {
    match (dir.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(dir),
    }
}

/// Actions that put shims for every trigger into `hooks_dir`.
pub fn plan_hooks_dir(hooks_dir: &Path) -> Vec<InstallAction> {
    let mut actions = Vec::new();
    if !hooks_dir.is_dir() {
        actions.push(InstallAction::CreateDir(hooks_dir.to_path_buf()));
    }
    for trigger in TRIGGERS {
        let path = hooks_dir.join(trigger);
        if path.is_file() {
            let existing = fs::read_to_string(&path).unwrap_or_default();
            if !is_shim(&existing) {
                actions.push(InstallAction::MoveLegacy {
                    from: path.clone(),
                    to: hooks_dir.join(format!("{trigger}.replaced.githook")),
                });
            }
        }
        actions.push(InstallAction::WriteShim {
            path,
            trigger: trigger.to_string(),
        });
    }
    actions
}

/// Plan a full installation.
pub fn plan(
    options: &InstallOptions,
    store: &dyn ConfigStore,
    repo: Option<&RepoContext>,
    decisions: &dyn DecisionProvider,
) -> Result<Vec<InstallAction>> {
    let mut actions = Vec::new();

    if options.single {
        let repo = repo.ok_or_else(|| {
            HookError::EnvironmentMissing("--single must be run inside a git repository".into())
        })?;
        actions.extend(plan_hooks_dir(&repo.hooks_dir));
        actions.push(InstallAction::SetConfig {
            scope: ConfigScope::Local(repo.root.clone()),
            key: keys::SINGLE_INSTALL.to_string(),
            value: "true".to_string(),
        });
    } else {
        let (template_dir, source) = find_template_dir(options.template_dir.as_deref(), store)?;
        actions.extend(plan_hooks_dir(&template_dir.join("hooks")));
        if source == TemplateSource::Explicit {
            actions.push(InstallAction::SetConfig {
                scope: ConfigScope::Global,
                key: TEMPLATE_DIR_KEY.to_string(),
                value: template_dir.display().to_string(),
            });
        }
        if let Some(repo) = repo {
            actions.extend(plan_hooks_dir(&repo.hooks_dir));
        }
    }

    if store
        .get(&ConfigScope::Global, keys::AUTOUPDATE_ENABLED)?
        .is_none()
    {
        let enable = options.non_interactive
            || decisions.confirm("Enable automatic update checks?", true)?;
        actions.push(InstallAction::SetConfig {
            scope: ConfigScope::Global,
            key: keys::AUTOUPDATE_ENABLED.to_string(),
            value: enable.to_string(),
        });
    }

    actions.push(InstallAction::SetConfig {
        scope: ConfigScope::Global,
        key: ALIAS_KEY.to_string(),
        value: ALIAS_VALUE.to_string(),
    });
    Ok(actions)
}

/// Carry out `actions` in order.
pub fn apply(actions: &[InstallAction], binary: &Path, store: &dyn ConfigStore) -> Result<()> {
    for action in actions {
        info!(%action, "install");
        match action {
            InstallAction::CreateDir(path) => fs::create_dir_all(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
            InstallAction::MoveLegacy { from, to } => fs::rename(from, to)
                .with_context(|| format!("Failed to move {}", from.display()))?,
            InstallAction::WriteShim { path, trigger } => {
                fs::write(path, render_shim(binary, trigger, CURRENT_VERSION))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                make_executable(path)?;
            }
            InstallAction::SetConfig { scope, key, value } => store.set(scope, key, value)?,
        }
    }
    Ok(())
}

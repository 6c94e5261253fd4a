//! run <trigger> [args...]
//!
//! Entry point of every installed hook shim.

use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Read;
use tracing::{debug, warn};

use super::common::{decisions_for, open_store};
use crate::config::{ConfigScope, ConfigStore};
use crate::engine::{DecisionProvider, HookEngine};
use crate::error::{HookError, Result};
use crate::git::RepoContext;
use crate::hooks::{is_trigger, STDIN_TRIGGERS};
use crate::shared::shared_root;
use crate::update::{is_single_install, HttpFetcher, ScriptFetcher, UpdateChecker};

pub fn execute(trigger: String, args: Vec<String>, non_interactive: bool) -> Result<()> {
    if !is_trigger(&trigger) {
        return Err(HookError::Other(anyhow::anyhow!("Unknown trigger '{trigger}'")));
    }
    let cwd = std::env::current_dir()?;
    let repo = RepoContext::discover(&cwd)?;
    let store = open_store();
    let decisions = decisions_for(&store, Some(&repo), non_interactive)?;

    let stdin = if STDIN_TRIGGERS.contains(&trigger.as_str()) {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    let mut engine = HookEngine::new(&repo, &store, decisions.as_ref(), shared_root()?)?;
    let summary = engine.process(&trigger, &args, stdin.as_deref())?;
    debug!(trigger, ?summary, "hooks processed");

    if trigger == "post-commit" && !summary.skipped_all {
        let fetcher = HttpFetcher;
        check_for_update(&store, &repo, decisions.as_ref(), &fetcher, Utc::now())?;
    }
    Ok(())
}

/// Daily update check after `post-commit`.
///
/// An unreachable server only warns. Anything else, such as a failing
/// installer, is reported through the exit code; the commit itself is
/// already done at this point.
fn check_for_update(
    store: &dyn ConfigStore,
    repo: &RepoContext,
    decisions: &dyn DecisionProvider,
    fetcher: &dyn ScriptFetcher,
    now: DateTime<Utc>,
) -> Result<()> {
    let scope = ConfigScope::Local(repo.root.clone());
    let single = is_single_install(store, Some(&scope)).unwrap_or(false);
    match UpdateChecker::new(store, fetcher).run_periodic(decisions, single, now) {
        Ok(_) => Ok(()),
        Err(e) if !e.is_fatal() => {
            warn!(error = %e, "update check failed");
            eprintln!("{} githooks: update check failed: {e}", "⚠".yellow());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keys, MemoryConfigStore};
    use crate::engine::NonInteractive;
    use chrono::TimeZone;

    struct Unreachable;

    impl ScriptFetcher for Unreachable {
        fn fetch(&self, _url: &str) -> Result<String> {
            Err(HookError::Network("connection refused".to_string()))
        }
    }

    struct BrokenEnvironment;

    impl ScriptFetcher for BrokenEnvironment {
        fn fetch(&self, _url: &str) -> Result<String> {
            Err(HookError::EnvironmentMissing("sh not found".to_string()))
        }
    }

    fn enabled_store() -> MemoryConfigStore {
        let store = MemoryConfigStore::new();
        store
            .set(&ConfigScope::Global, keys::AUTOUPDATE_ENABLED, "true")
            .unwrap();
        store
    }

    #[test]
    fn test_unreachable_update_server_only_warns() {
        let store = enabled_store();
        let repo = RepoContext::from_parts("/repo", "/repo/.git");
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        check_for_update(&store, &repo, &NonInteractive::default(), &Unreachable, now).unwrap();
        assert_eq!(
            store
                .get(&ConfigScope::Global, keys::AUTOUPDATE_LAST_RUN)
                .unwrap()
                .as_deref(),
            Some("1700000000")
        );
    }

    #[test]
    fn test_other_update_failures_are_reported() {
        let store = enabled_store();
        let repo = RepoContext::from_parts("/repo", "/repo/.git");
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let err = check_for_update(&store, &repo, &NonInteractive::default(), &BrokenEnvironment, now)
            .unwrap_err();
        assert!(err.is_fatal());
    }
}

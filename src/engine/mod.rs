//! Hook execution engine
//!
//! One [`HookEngine::process`] call handles one Git trigger: it checks the
//! disable switch, syncs shared repositories on `post-merge`, settles the
//! repository trust question, then runs the legacy hook, global shared
//! hooks, local shared hooks and local hooks in that order. The first
//! failing hook aborts everything after it.
//!
//! Each hook file is checked against the ignore patterns, the trust state
//! and the checksum ledger before it runs. Hooks that are new or changed
//! go to the [`DecisionProvider`].

pub mod decision;
pub mod exec;

use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{env, env_flag, keys, parse_bool, ConfigScope, ConfigStore};
use crate::error::{HookError, Result};
use crate::fs::is_executable;
use crate::git::runner::NETWORK_TIMEOUT;
use crate::git::RepoContext;
use crate::hooks::ledger::hash_file;
use crate::hooks::{
    hooks_in, ChecksumLedger, HookFile, HookSource, HookState, IgnoreFilter, TrustState,
};
use crate::shared::{self, sync_all, SharedRepo, SyncReport};

pub use decision::{
    is_ci, select_provider, DecisionProvider, HookDecision, NonInteractive, ScriptedDecisions,
    TerminalPrompt,
};

/// What happened to one hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Ran,
    Ignored,
    Disabled,
    Declined,
}

/// Tally of one trigger invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// The disable switch was on; nothing was looked at.
    pub skipped_all: bool,
    pub ran: usize,
    pub ignored: usize,
    pub disabled: usize,
    pub declined: usize,
}

impl RunSummary {
    fn count(&mut self, outcome: HookOutcome) {
        match outcome {
            HookOutcome::Ran => self.ran += 1,
            HookOutcome::Ignored => self.ignored += 1,
            HookOutcome::Disabled => self.disabled += 1,
            HookOutcome::Declined => self.declined += 1,
        }
    }
}

pub struct HookEngine<'a> {
    repo: &'a RepoContext,
    store: &'a dyn ConfigStore,
    decisions: &'a dyn DecisionProvider,
    shared_root: PathBuf,
    ledger: ChecksumLedger,
    trust: TrustState,
    /// Set by a "yes to all" answer; lasts for this invocation only.
    accept_all: bool,
}

impl<'a> HookEngine<'a> {
    pub fn new(
        repo: &'a RepoContext,
        store: &'a dyn ConfigStore,
        decisions: &'a dyn DecisionProvider,
        shared_root: PathBuf,
    ) -> Result<Self> {
        let ledger = ChecksumLedger::load(repo.ledger_path())?;
        let trust = TrustState::load(repo, store)?;
        Ok(Self {
            repo,
            store,
            decisions,
            shared_root,
            ledger,
            trust,
            accept_all: false,
        })
    }

    pub fn ledger(&self) -> &ChecksumLedger {
        &self.ledger
    }

    pub fn trust(&self) -> TrustState {
        self.trust
    }

    fn local_scope(&self) -> ConfigScope {
        ConfigScope::Local(self.repo.root.clone())
    }

    /// Whether every hook is switched off by config or environment.
    pub fn is_disabled(&self) -> Result<bool> {
        if env_flag(env::DISABLE) {
            return Ok(true);
        }
        Ok(self
            .store
            .get_effective(&self.local_scope(), keys::DISABLE)?
            .map(|v| parse_bool(&v))
            .unwrap_or(false))
    }

    fn fail_on_missing_shared(&self) -> Result<bool> {
        Ok(self
            .store
            .get_effective(&self.local_scope(), keys::FAIL_ON_MISSING_SHARED)?
            .map(|v| parse_bool(&v))
            .unwrap_or(false))
    }

    /// Process one trigger event.
    ///
    /// Declined, disabled and ignored hooks count as success. A failing
    /// hook returns [`HookError::HookFailed`] and nothing after it runs.
    pub fn process(
        &mut self,
        trigger: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<RunSummary> {
        if self.is_disabled()? {
            info!(trigger, "githooks disabled, skipping all hooks");
            return Ok(RunSummary {
                skipped_all: true,
                ..RunSummary::default()
            });
        }

        if trigger == "post-merge" {
            if let Err(e) = self.sync_shared() {
                warn!(error = %e, "shared hook sync failed");
                eprintln!("{} githooks: shared hook sync failed: {e:#}", "⚠".yellow());
            }
        }

        self.settle_trust()?;

        let hooks = self.collect(trigger, self.fail_on_missing_shared()?)?;
        debug!(trigger, count = hooks.len(), "hooks collected");

        let mut summary = RunSummary::default();
        for hook in &hooks {
            let outcome = self.run_checked(hook, args, stdin)?;
            summary.count(outcome);
        }
        Ok(summary)
    }

    /// Every hook file for `trigger`, in execution order.
    ///
    /// With `strict`, a declared shared repository that has not been
    /// cloned yet is an error instead of a warning.
    pub fn collect(&self, trigger: &str, strict: bool) -> Result<Vec<HookFile>> {
        let mut hooks = Vec::new();

        let legacy = self.repo.replaced_hook(trigger);
        if is_executable(&legacy) {
            hooks.push(HookFile::new(
                legacy,
                trigger,
                HookSource::Replaced,
                &self.repo.hooks_dir,
            ));
        }

        let phases = [
            (HookSource::SharedGlobal, shared::global_repos(self.store)?),
            (HookSource::SharedLocal, shared::local_repos(self.repo)?),
        ];
        let mut seen: Vec<String> = Vec::new();
        for (source, repos) in phases {
            for repo in repos {
                if seen.contains(&repo.name) {
                    debug!(url = %repo.url, "shared repository already collected");
                    continue;
                }
                seen.push(repo.name.clone());
                if !repo.is_cloned(&self.shared_root) {
                    if strict {
                        return Err(HookError::EnvironmentMissing(format!(
                            "shared hook repository '{}' is not available, run `git hooks pull`",
                            repo.url
                        )));
                    }
                    warn!(url = %repo.url, "shared hook repository not cloned yet");
                    continue;
                }
                let root = repo.hook_root(&self.shared_root);
                hooks.extend(hooks_in(&root, trigger, source)?);
            }
        }

        hooks.extend(hooks_in(&self.repo.hook_root(), trigger, HookSource::Local)?);
        Ok(hooks)
    }

    /// Display state of `hook` without running it.
    pub fn classify(&self, hook: &HookFile) -> Result<HookState> {
        Ok(self.evaluate(hook)?.0)
    }

    /// State plus the content hash when the ledger had to be consulted.
    fn evaluate(&self, hook: &HookFile) -> Result<(HookState, Option<String>)> {
        if hook.source == HookSource::Replaced {
            return Ok((HookState::Active, None));
        }
        let filter = IgnoreFilter::load(&hook.hook_root, &hook.trigger)?;
        if filter.is_ignored(&hook.path) {
            return Ok((HookState::Ignored, None));
        }
        if self.trust.is_trusted() {
            return Ok((HookState::ActiveTrusted, None));
        }
        let hash = hash_file(&hook.path)?;
        Ok((self.ledger.classify(&hook.path, &hash), Some(hash)))
    }

    /// Ask about trust once when the repository requests it.
    fn settle_trust(&mut self) -> Result<()> {
        if self.trust != TrustState::Unset {
            return Ok(());
        }
        if let Some(accepted) = self.decisions.decide_trust()? {
            self.trust = TrustState::record(self.repo, self.store, accepted)?;
            info!(accepted, "recorded repository trust decision");
        }
        Ok(())
    }

    fn run_checked(
        &mut self,
        hook: &HookFile,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<HookOutcome> {
        let (state, hash) = self.evaluate(hook)?;
        match state {
            HookState::Ignored => {
                debug!(hook = %hook.path.display(), "ignored");
                Ok(HookOutcome::Ignored)
            }
            HookState::Disabled => {
                eprintln!(
                    "{} githooks: {} hook '{}' is disabled, run `git hooks enable {} {}` to enable it",
                    "⚠".yellow(),
                    hook.trigger,
                    hook.name(),
                    hook.trigger,
                    hook.name()
                );
                Ok(HookOutcome::Disabled)
            }
            HookState::Active | HookState::ActiveTrusted => {
                self.execute(hook, args, stdin)?;
                Ok(HookOutcome::Ran)
            }
            HookState::PendingNew | HookState::PendingChanged => {
                let decision = if self.accept_all {
                    HookDecision::Yes
                } else {
                    self.decisions.decide_hook(hook, state)?
                };
                match decision {
                    HookDecision::Yes | HookDecision::YesAll => {
                        if decision == HookDecision::YesAll {
                            self.accept_all = true;
                        }
                        let hash = match hash {
                            Some(hash) => hash,
                            None => hash_file(&hook.path)?,
                        };
                        self.ledger.record_accepted(&hook.path, &hash)?;
                        self.execute(hook, args, stdin)?;
                        Ok(HookOutcome::Ran)
                    }
                    HookDecision::No => {
                        eprintln!(
                            "{} githooks: skipped {} hook '{}' (not accepted)",
                            "⚠".yellow(),
                            hook.trigger,
                            hook.name()
                        );
                        Ok(HookOutcome::Declined)
                    }
                    HookDecision::Disable => {
                        if !self.ledger.is_disabled(&hook.path) {
                            self.ledger.record_disabled(&hook.path)?;
                        }
                        eprintln!(
                            "{} githooks: disabled {} hook '{}'",
                            "→".blue(),
                            hook.trigger,
                            hook.name()
                        );
                        Ok(HookOutcome::Disabled)
                    }
                }
            }
        }
    }

    fn execute(&self, hook: &HookFile, args: &[String], stdin: Option<&[u8]>) -> Result<()> {
        info!(hook = %hook.path.display(), source = %hook.source, "running hook");
        let code = exec::run_hook_file(hook, args, stdin, &self.repo.root)?;
        if code != 0 {
            eprintln!(
                "{} githooks: {} hook '{}' failed with exit code {code}",
                "✗".red(),
                hook.trigger,
                hook.name()
            );
            return Err(HookError::HookFailed {
                path: hook.path.clone(),
                code,
            });
        }
        Ok(())
    }

    /// Clone or update every declared shared repository.
    pub fn sync_shared(&self) -> anyhow::Result<SyncReport> {
        let repos = declared_shared(self.store, Some(self.repo))?;
        sync_all(&repos, &self.shared_root, NETWORK_TIMEOUT)
    }

    pub fn shared_root(&self) -> &Path {
        &self.shared_root
    }
}

/// Global and local shared repositories, deduplicated by cache name.
pub fn declared_shared(
    store: &dyn ConfigStore,
    repo: Option<&RepoContext>,
) -> anyhow::Result<Vec<SharedRepo>> {
    let mut repos = shared::global_repos(store)?;
    if let Some(repo) = repo {
        for local in shared::local_repos(repo)? {
            if !repos.iter().any(|r| r.name == local.name) {
                repos.push(local);
            }
        }
    }
    Ok(repos)
}

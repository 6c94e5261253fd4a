//! Decisions the engine cannot make on its own
//!
//! Whether to run an unknown hook, whether to trust a repository, whether
//! to install an update: all go through a [`DecisionProvider`]. Hook runs
//! from an interactive shell get [`TerminalPrompt`]; everything else gets
//! [`NonInteractive`], which never blocks.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use crate::config::{env, env_flag};
use crate::hooks::{HookFile, HookState};

/// CI provider environment variables checked by [`is_ci`].
const CI_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "CIRCLECI",
    "TRAVIS",
    "BITBUCKET_PIPELINES",
    "TF_BUILD",
    "DRONE",
    "TEAMCITY_VERSION",
];

/// Check if the current process is running in a CI environment.
pub fn is_ci() -> bool {
    if std::env::var("CI")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
    {
        return true;
    }
    CI_VARS.iter().any(|var| std::env::var(var).is_ok())
}

/// Answer for a hook that is new or has changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Accept and run this hook.
    Yes,
    /// Accept this and every remaining hook of the current run.
    YesAll,
    /// Skip it this time.
    No,
    /// Skip it now and in the future.
    Disable,
}

pub trait DecisionProvider {
    /// Asked for a hook in state `PendingNew` or `PendingChanged`.
    fn decide_hook(&self, hook: &HookFile, state: HookState) -> Result<HookDecision>;

    /// `None` leaves the trust state unset.
    fn decide_trust(&self) -> Result<Option<bool>>;

    fn decide_update(&self, current: &str, latest: &str) -> Result<bool>;

    /// Generic yes/no question; `default` is the answer to an empty line.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;

    fn is_interactive(&self) -> bool;
}

/// Asks on the controlling terminal.
pub struct TerminalPrompt {
    tty: RefCell<File>,
}

impl TerminalPrompt {
    /// `None` when there is no controlling terminal.
    pub fn open() -> Option<Self> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .ok()
            .map(|tty| Self {
                tty: RefCell::new(tty),
            })
    }

    /// Print `question` and read one trimmed, lowercased line. EOF reads as "".
    fn ask(&self, question: &str) -> Result<String> {
        let mut tty = self.tty.borrow_mut();
        write!(tty, "{question}").context("Failed to write prompt")?;
        tty.flush().context("Failed to flush prompt")?;

        let mut input = String::new();
        BufReader::new(&*tty)
            .read_line(&mut input)
            .context("Failed to read answer")?;
        Ok(input.trim().to_lowercase())
    }
}

impl DecisionProvider for TerminalPrompt {
    fn decide_hook(&self, hook: &HookFile, state: HookState) -> Result<HookDecision> {
        let what = match state {
            HookState::PendingChanged => "has changed since it was last accepted",
            _ => "is new",
        };
        let question = format!(
            "githooks: {} hook '{}' {what}.\n  {}\n  Do you accept it? (Yes, all, no, disable) [y/a/n/d] ",
            hook.trigger,
            hook.name(),
            hook.path.display(),
        );
        loop {
            match self.ask(&question)?.as_str() {
                "y" | "yes" => return Ok(HookDecision::Yes),
                "a" | "all" => return Ok(HookDecision::YesAll),
                "d" | "disable" => return Ok(HookDecision::Disable),
                "n" | "no" | "" => return Ok(HookDecision::No),
                _ => continue,
            }
        }
    }

    fn decide_trust(&self) -> Result<Option<bool>> {
        let answer = self.ask(
            "githooks: this repository wants you to trust all current and future hooks \
             without prompting.\n  Do you want to allow running every current and future hook? [y/N] ",
        )?;
        Ok(Some(matches!(answer.as_str(), "y" | "yes")))
    }

    fn decide_update(&self, current: &str, latest: &str) -> Result<bool> {
        let answer = self.ask(&format!(
            "githooks: version {latest} is available (installed: {current}).\n  Would you like to install it now? [Y/n] "
        ))?;
        Ok(matches!(answer.as_str(), "" | "y" | "yes"))
    }

    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.ask(&format!("githooks: {question} {hint} "))?;
        Ok(match answer.as_str() {
            "" => default,
            a => matches!(a, "y" | "yes"),
        })
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Never prompts: a configured default for every decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive {
    /// Run new and changed hooks (recording them as accepted).
    pub accept_new: bool,
}

impl DecisionProvider for NonInteractive {
    fn decide_hook(&self, _hook: &HookFile, _state: HookState) -> Result<HookDecision> {
        Ok(if self.accept_new {
            HookDecision::Yes
        } else {
            HookDecision::No
        })
    }

    fn decide_trust(&self) -> Result<Option<bool>> {
        Ok(None)
    }

    fn decide_update(&self, _current: &str, _latest: &str) -> Result<bool> {
        Ok(false)
    }

    fn confirm(&self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Replays queued answers, for tests and automation. Running out of
/// answers behaves like [`NonInteractive`] with `accept_new = false`.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    hooks: RefCell<VecDeque<HookDecision>>,
    trust: RefCell<VecDeque<bool>>,
    update: RefCell<VecDeque<bool>>,
    confirms: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hooks(self, answers: impl IntoIterator<Item = HookDecision>) -> Self {
        self.hooks.borrow_mut().extend(answers);
        self
    }

    pub fn with_trust(self, answer: bool) -> Self {
        self.trust.borrow_mut().push_back(answer);
        self
    }

    pub fn with_update(self, answer: bool) -> Self {
        self.update.borrow_mut().push_back(answer);
        self
    }

    pub fn with_confirm(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    /// Hook names asked about, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide_hook(&self, hook: &HookFile, _state: HookState) -> Result<HookDecision> {
        self.asked.borrow_mut().push(hook.name());
        Ok(self
            .hooks
            .borrow_mut()
            .pop_front()
            .unwrap_or(HookDecision::No))
    }

    fn decide_trust(&self) -> Result<Option<bool>> {
        Ok(self.trust.borrow_mut().pop_front())
    }

    fn decide_update(&self, _current: &str, _latest: &str) -> Result<bool> {
        Ok(self.update.borrow_mut().pop_front().unwrap_or(false))
    }

    fn confirm(&self, _question: &str, default: bool) -> Result<bool> {
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(default))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Pick the provider for this process.
pub fn select_provider(force_non_interactive: bool, accept_new: bool) -> Box<dyn DecisionProvider> {
    if force_non_interactive || env_flag(env::NON_INTERACTIVE) || is_ci() {
        return Box::new(NonInteractive { accept_new });
    }
    match TerminalPrompt::open() {
        Some(prompt) => Box::new(prompt),
        None => Box::new(NonInteractive { accept_new }),
    }
}

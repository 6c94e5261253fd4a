//! list [trigger...] [--json]

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use super::common::{current_repo, display_path, open_store};
use crate::config::ConfigStore;
use crate::engine::{HookEngine, NonInteractive};
use crate::git::RepoContext;
use crate::hooks::{is_trigger, HookSource, HookState, TRIGGERS};
use crate::shared::shared_root;

#[derive(Debug, Clone, Serialize)]
pub struct ListedHook {
    pub trigger: String,
    pub name: String,
    pub path: String,
    pub source: HookSource,
    pub state: HookState,
}

pub fn execute(triggers: Vec<String>, json: bool) -> Result<()> {
    let repo = current_repo()?;
    let store = open_store();
    let hooks = collect(&repo, &store, &triggers)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hooks)?);
        return Ok(());
    }
    print_listing(&hooks, &triggers);
    Ok(())
}

/// Classified hooks for `triggers`, or for every trigger when empty.
pub fn collect(
    repo: &RepoContext,
    store: &dyn ConfigStore,
    triggers: &[String],
) -> Result<Vec<ListedHook>> {
    for trigger in triggers {
        if !is_trigger(trigger) {
            bail!("Unknown trigger '{trigger}'");
        }
    }
    let wanted: Vec<&str> = if triggers.is_empty() {
        TRIGGERS.to_vec()
    } else {
        triggers.iter().map(String::as_str).collect()
    };

    let decisions = NonInteractive::default();
    let engine = HookEngine::new(repo, store, &decisions, shared_root()?)?;

    let mut listed = Vec::new();
    for trigger in wanted {
        for hook in engine.collect(trigger, false)? {
            let state = engine.classify(&hook)?;
            listed.push(ListedHook {
                trigger: trigger.to_string(),
                name: hook.name(),
                path: display_path(repo, &hook.path),
                source: hook.source,
                state,
            });
        }
    }
    Ok(listed)
}

fn print_listing(hooks: &[ListedHook], requested: &[String]) {
    if hooks.is_empty() {
        println!("(no hooks found)");
        return;
    }

    let mut triggers: Vec<&str> = Vec::new();
    for hook in hooks {
        if !triggers.contains(&hook.trigger.as_str()) {
            triggers.push(&hook.trigger);
        }
    }
    for trigger in requested {
        if !triggers.contains(&trigger.as_str()) {
            println!("{}\n  (none)", trigger.bold());
        }
    }

    for trigger in triggers {
        println!("{}", trigger.bold());
        for source in [
            HookSource::Local,
            HookSource::SharedGlobal,
            HookSource::SharedLocal,
            HookSource::Replaced,
        ] {
            let group: Vec<&ListedHook> = hooks
                .iter()
                .filter(|h| h.trigger == trigger && h.source == source)
                .collect();
            if group.is_empty() {
                continue;
            }
            println!("  {}", source.to_string().dimmed());
            for hook in group {
                println!("    - {} ({})", hook.name, colored_state(hook.state));
            }
        }
    }
}

fn colored_state(state: HookState) -> colored::ColoredString {
    let label = state.to_string();
    match state {
        HookState::Active | HookState::ActiveTrusted => label.green(),
        HookState::PendingNew | HookState::PendingChanged => label.yellow(),
        HookState::Disabled => label.red(),
        HookState::Ignored => label.dimmed(),
    }
}

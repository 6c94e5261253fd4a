use anyhow::Result;
use githooks::commands::{
    self, install, list, manage, readme, run,
    shared::{self, ScopeFlags},
    trust::{self, TrustAction},
    update::{self, UpdateAction},
};

use super::types::{
    Commands, ReadmeCommands, ScopeArgs, SharedCommands, TrustCommands, UpdateCommands,
};

fn flags(scope: ScopeArgs, all: bool) -> ScopeFlags {
    ScopeFlags {
        global: scope.global,
        local: scope.local,
        all,
    }
}

pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Disable { all, target } => manage::disable(target, all),
        Commands::Enable { all, target } => manage::enable(target, all),
        Commands::Accept { target } => manage::accept(target),
        Commands::Trust { action } => trust::execute(match action {
            None => TrustAction::Grant,
            Some(TrustCommands::Revoke) => TrustAction::Revoke,
            Some(TrustCommands::Delete) => TrustAction::Delete,
            Some(TrustCommands::Forget) => TrustAction::Forget,
        }),
        Commands::List { triggers, json } => list::execute(triggers, json),
        Commands::Shared { command } => match command {
            SharedCommands::Add { scope, url } => shared::add(url, flags(scope, false)),
            SharedCommands::Remove { scope, url } => shared::remove(url, flags(scope, false)),
            SharedCommands::Clear { scope, all } => shared::clear(flags(scope, all)),
            SharedCommands::List { scope, all } => shared::list(flags(scope, all)),
            SharedCommands::Update => shared::pull(),
        },
        Commands::Pull => shared::pull(),
        Commands::Update { action } => update::execute(match action {
            None => UpdateAction::Check,
            Some(UpdateCommands::Force) => UpdateAction::Force,
            Some(UpdateCommands::Enable) => UpdateAction::Enable,
            Some(UpdateCommands::Disable) => UpdateAction::Disable,
        }),
        Commands::Readme { action } => {
            readme::execute(matches!(action, Some(ReadmeCommands::Update)))
        }
        Commands::Version => commands::version(),
        Commands::Install {
            dry_run,
            non_interactive,
            single,
            template_dir,
        } => install::execute(dry_run, non_interactive, single, template_dir),
        Commands::Run {
            non_interactive,
            trigger,
            args,
        } => Ok(run::execute(trigger, args, non_interactive)?),
    }
}

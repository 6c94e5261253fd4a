use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "githooks")]
#[command(about = "Per-repository and shared Git hook manager", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Disable hooks so they are skipped
    Disable {
        /// Disable every hook in this repository
        #[arg(short, long)]
        all: bool,

        /// [trigger] [file], a path, or a hook name (default: all local hooks)
        target: Vec<String>,
    },

    /// Enable previously disabled hooks
    Enable {
        /// Lift the repository-wide switch set by `disable --all`
        #[arg(short, long)]
        all: bool,

        /// [trigger] [file], a path, or a hook name (default: all local hooks)
        target: Vec<String>,
    },

    /// Accept the current content of hooks so they run without asking
    Accept {
        /// [trigger] [file], a path, or a hook name (default: all local hooks)
        target: Vec<String>,
    },

    /// Trust all hooks of this repository
    Trust {
        #[command(subcommand)]
        action: Option<TrustCommands>,
    },

    /// List hooks and their state
    List {
        /// Triggers to list (default: every trigger that has hooks)
        triggers: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage shared hook repositories
    Shared {
        #[command(subcommand)]
        command: SharedCommands,
    },

    /// Clone or update all shared hook repositories
    Pull,

    /// Check for a new version of githooks
    Update {
        #[command(subcommand)]
        action: Option<UpdateCommands>,
    },

    /// Add or update the README in .githooks
    Readme {
        #[command(subcommand)]
        action: Option<ReadmeCommands>,
    },

    /// Print the installed version
    Version,

    /// Install hook shims into Git's templates and the current repository
    Install {
        /// Show what would be done without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Never prompt
        #[arg(long)]
        non_interactive: bool,

        /// Install into the current repository only
        #[arg(long)]
        single: bool,

        /// Git template directory to install into
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Run the hooks for a Git trigger (called by the installed shims)
    #[command(hide = true)]
    Run {
        /// Never prompt; new hooks follow `githooks.autoaccept`
        #[arg(long)]
        non_interactive: bool,

        /// Git trigger name, e.g. pre-commit
        trigger: String,

        /// Arguments Git passed to the hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum TrustCommands {
    /// Stop trusting this repository's hooks
    Revoke,
    /// Delete the trust marker and stop trusting
    Delete,
    /// Forget the trust decision so the next hook run asks again
    Forget,
}

#[derive(Args, Clone, Copy, Default)]
pub struct ScopeArgs {
    /// Global list in git config
    #[arg(long)]
    pub global: bool,

    /// This repository's .githooks/.shared
    #[arg(long)]
    pub local: bool,
}

#[derive(Subcommand)]
pub enum SharedCommands {
    /// Add a shared hook repository
    Add {
        #[command(flatten)]
        scope: ScopeArgs,
        url: String,
    },
    /// Remove a shared hook repository
    Remove {
        #[command(flatten)]
        scope: ScopeArgs,
        url: String,
    },
    /// Remove every shared hook repository
    Clear {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Both lists, and delete the local cache
        #[arg(long)]
        all: bool,
    },
    /// Show shared hook repositories
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Both lists
        #[arg(long)]
        all: bool,
    },
    /// Clone or update all shared hook repositories
    Update,
}

#[derive(Subcommand)]
pub enum UpdateCommands {
    /// Reinstall even when up to date
    Force,
    /// Turn on the daily update check
    Enable,
    /// Turn off the daily update check
    Disable,
}

#[derive(Subcommand)]
pub enum ReadmeCommands {
    /// Create .githooks/README.md (fails if present)
    Add,
    /// Overwrite .githooks/README.md
    Update,
}

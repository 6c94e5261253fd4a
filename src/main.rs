use clap::Parser;
use colored::Colorize;
use githooks::config::env;
use githooks::error::HookError;
use std::io::IsTerminal;
use std::process::ExitCode;

mod cli;

use cli::{dispatch, Cli};

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env(env::LOG)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}

/// `githooks <command...> help` is accepted as `--help`, except for hook
/// arguments passed through `run`.
fn rewrite_trailing_help(mut args: Vec<String>) -> Vec<String> {
    let is_run = args.get(1).map(String::as_str) == Some("run");
    if args.len() > 2 && !is_run && args.last().map(String::as_str) == Some("help") {
        if let Some(last) = args.last_mut() {
            *last = "--help".to_string();
        }
    }
    args
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(rewrite_trailing_help(std::env::args().collect()));

    if let Err(e) = init_tracing() {
        eprintln!("{} {e:#}", "⚠".yellow());
    }

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = match e.downcast_ref::<HookError>() {
                Some(hook_error) => hook_error.exit_code(),
                None => 1,
            };
            // Hook failures were already reported by the engine
            if !matches!(e.downcast_ref::<HookError>(), Some(HookError::HookFailed { .. })) {
                eprintln!("{} githooks: {e:#}", "✗".red());
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

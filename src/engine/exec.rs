//! Running a single hook file

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use tracing::debug;

use crate::hooks::HookFile;

/// `ENOEXEC`: an executable without a usable interpreter line.
const EXEC_FORMAT_ERROR: i32 = 8;

/// Run `hook` with `args` from `cwd` and return its exit code.
///
/// Executable files run directly, anything else through `sh`. When `stdin`
/// is given it is written to the hook's standard input, otherwise the hook
/// inherits ours.
pub fn run_hook_file(
    hook: &HookFile,
    args: &[String],
    stdin: Option<&[u8]>,
    cwd: &Path,
) -> io::Result<i32> {
    let status = if hook.executable {
        match spawn_and_wait(direct(hook), args, stdin, cwd) {
            Err(e) if e.raw_os_error() == Some(EXEC_FORMAT_ERROR) => {
                debug!(hook = %hook.path.display(), "no interpreter line, falling back to sh");
                spawn_and_wait(via_shell(hook), args, stdin, cwd)?
            }
            other => other?,
        }
    } else {
        spawn_and_wait(via_shell(hook), args, stdin, cwd)?
    };
    Ok(exit_code(status))
}

fn direct(hook: &HookFile) -> Command {
    Command::new(&hook.path)
}

fn via_shell(hook: &HookFile) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg(&hook.path);
    cmd
}

fn spawn_and_wait(
    mut cmd: Command,
    args: &[String],
    stdin: Option<&[u8]>,
    cwd: &Path,
) -> io::Result<ExitStatus> {
    cmd.args(args).current_dir(cwd);

    let Some(data) = stdin else {
        return cmd.stdin(Stdio::inherit()).status();
    };

    let mut child = cmd.stdin(Stdio::piped()).spawn()?;
    if let Some(mut pipe) = child.stdin.take() {
        let data = data.to_vec();
        // A hook that never reads stdin must not block us on a full pipe.
        thread::spawn(move || {
            let _ = pipe.write_all(&data);
        });
    }
    child.wait()
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

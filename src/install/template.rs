//! Files written by `install` and `readme`

use std::path::Path;

use crate::update::version_line;

/// Second line of every shim; identifies files we may overwrite.
pub const SHIM_MARKER: &str = "# Base Git hook template from githooks";

/// Hook shim for `trigger` that hands over to `binary`.
pub fn render_shim(binary: &Path, trigger: &str, version: &str) -> String {
    let binary = shell_escape::escape(binary.to_string_lossy());
    let trigger = shell_escape::escape(trigger.into());
    format!(
        "#!/bin/sh\n{SHIM_MARKER}\n{}\n\nexec {binary} run {trigger} \"$@\"\n",
        version_line(version)
    )
}

pub fn is_shim(content: &str) -> bool {
    content.lines().take(5).any(|l| l.trim() == SHIM_MARKER)
}

pub const README: &str = r#"# Git hooks

This repository keeps its Git hooks in `.githooks`. They are run by
[githooks](https://github.com/githooks-rs/githooks) when it is installed.

## Layout

- `.githooks/<trigger>/<name>`: every file runs for that Git trigger, in
  lexicographic order
- `.githooks/<trigger>`: a single hook file for that trigger
- `.githooks/.ignore`, `.githooks/<trigger>/.ignore`: glob patterns of hook
  file names to skip
- `.githooks/.shared`: URLs of shared hook repositories, one per line
- `.githooks/trust-all`: asks everyone to trust all hooks in this repository

## Accepting hooks

New or changed hooks must be accepted before they run. Use
`git hooks list` to see their state and `git hooks accept`,
`git hooks disable` or `git hooks enable` to change it.
"#;

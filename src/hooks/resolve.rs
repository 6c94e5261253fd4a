//! Hook file discovery
//!
//! Two questions are answered here: which files run for a trigger
//! ([`hooks_in`]), and which files a command-line target such as
//! `githooks disable pre-commit lint` refers to ([`HookTarget::resolve`]).
//!
//! Target resolution ranks candidates explicitly:
//! exact path > path relative to the hook root > single basename match >
//! first of several basename matches. Among several matches directories
//! rank ahead of files and ties break lexicographically by path, so the
//! result never depends on the file system's listing order. Picking the
//! first of several matches is a known limitation; a warning names the
//! alternatives.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use super::{is_trigger, HookFile, HookSource};

/// Hook files run for `trigger` from `hook_root`, in lexicographic order.
///
/// `<root>/<trigger>` may be a single file or a directory whose regular,
/// non-hidden files are the hooks.
pub fn hooks_in(hook_root: &Path, trigger: &str, source: HookSource) -> io::Result<Vec<HookFile>> {
    let location = hook_root.join(trigger);
    if location.is_file() {
        return Ok(vec![HookFile::new(location, trigger, source, hook_root)]);
    }
    if !location.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(&location)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && !is_hidden(p))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|p| HookFile::new(p, trigger, source, hook_root))
        .collect())
}

/// Triggers that have hooks under `hook_root`.
pub fn triggers_in(hook_root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(hook_root) else {
        return Vec::new();
    };
    let mut triggers: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().to_str().map(String::from))
        .filter(|name| is_trigger(name))
        .collect();
    triggers.sort();
    triggers
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// How a target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No arguments: the whole hook root.
    Root,
    /// The argument was an existing path.
    Exact,
    /// The argument named a path under the hook root.
    RootRelative,
    /// Exactly one basename match under the hook root.
    Unique,
    /// Several basename matches; the best ranked one was taken.
    FirstOf(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookTarget {
    pub path: PathBuf,
    pub resolution: Resolution,
}

impl HookTarget {
    /// Resolve command-line arguments against `hook_root`.
    ///
    /// * no arguments: the hook root
    /// * `<trigger> <file>`: exactly `<root>/<trigger>/<file>`
    /// * `<arg>`: literal path, `<root>/<arg>`, then a basename search
    pub fn resolve(hook_root: &Path, args: &[String]) -> Result<Self> {
        match args {
            [] => Ok(Self {
                path: hook_root.to_path_buf(),
                resolution: Resolution::Root,
            }),
            [trigger, file] => {
                let path = hook_root.join(trigger).join(file);
                if !path.exists() {
                    bail!("Hook '{trigger}/{file}' not found in {}", hook_root.display());
                }
                Ok(Self {
                    path,
                    resolution: Resolution::Exact,
                })
            }
            [arg] => Self::resolve_single(hook_root, arg),
            _ => bail!("Expected at most two arguments: [trigger] [file]"),
        }
    }

    fn resolve_single(hook_root: &Path, arg: &str) -> Result<Self> {
        let literal = Path::new(arg);
        if literal.exists() {
            let path = literal
                .canonicalize()
                .with_context(|| format!("Failed to resolve {arg}"))?;
            return Ok(Self {
                path,
                resolution: Resolution::Exact,
            });
        }

        let relative = hook_root.join(arg);
        if relative.exists() {
            return Ok(Self {
                path: relative,
                resolution: Resolution::RootRelative,
            });
        }

        let mut candidates: Vec<(bool, PathBuf)> = WalkDir::new(hook_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy() == arg)
            .map(|e| (e.file_type().is_dir(), e.into_path()))
            .collect();
        // Directories first, then lexicographic
        candidates.sort_by(|(a_dir, a), (b_dir, b)| b_dir.cmp(a_dir).then_with(|| a.cmp(b)));

        match candidates.len() {
            0 => bail!("No hook named '{arg}' found in {}", hook_root.display()),
            1 => Ok(Self {
                path: candidates.remove(0).1,
                resolution: Resolution::Unique,
            }),
            n => {
                let chosen = candidates.remove(0).1;
                warn!(
                    chosen = %chosen.display(),
                    others = ?candidates.iter().map(|(_, p)| p.display().to_string()).collect::<Vec<_>>(),
                    "ambiguous hook name, using first match"
                );
                Ok(Self {
                    path: chosen,
                    resolution: Resolution::FirstOf(n),
                })
            }
        }
    }

    /// Hook files the target covers, sorted.
    ///
    /// The hook root expands to the hooks of every trigger directory;
    /// any other directory expands to all non-hidden files beneath it.
    pub fn hook_files(&self) -> Vec<PathBuf> {
        if self.path.is_file() {
            return vec![self.path.clone()];
        }
        if self.resolution == Resolution::Root {
            return triggers_in(&self.path)
                .iter()
                .flat_map(|t| files_under(&self.path.join(t)))
                .collect();
        }
        files_under(&self.path)
    }
}

fn files_under(path: &Path) -> Vec<PathBuf> {
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

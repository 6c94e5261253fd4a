//! Ignore patterns for hook files
//!
//! Patterns come from `<hook-root>/.ignore` and `<hook-root>/<trigger>/.ignore`.
//! Each non-blank, non-comment line is a shell glob matched against the
//! hook file's basename.

use glob::Pattern;
use std::io;
use std::path::Path;
use tracing::warn;

use crate::fs::read_list_file;

pub const IGNORE_FILE: &str = ".ignore";

#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    /// Combined filter for `trigger` under `hook_root`.
    pub fn load(hook_root: &Path, trigger: &str) -> io::Result<Self> {
        let mut lines = read_list_file(&hook_root.join(IGNORE_FILE))?;
        lines.extend(read_list_file(&hook_root.join(trigger).join(IGNORE_FILE))?);
        Ok(Self::from_patterns(&lines))
    }

    /// Build from raw pattern lines. Invalid globs are skipped with a warning.
    pub fn from_patterns<S: AsRef<str>>(lines: &[S]) -> Self {
        let patterns = lines
            .iter()
            .filter_map(|line| {
                let line = line.as_ref().trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                match Pattern::new(line) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warn!(pattern = line, error = %e, "invalid ignore pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, hook_path: &Path) -> bool {
        let Some(name) = hook_path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        self.patterns.iter().any(|p| p.matches(&name))
    }
}

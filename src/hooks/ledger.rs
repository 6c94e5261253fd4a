//! Per-repository checksum ledger
//!
//! The on-disk format is one line per record and is only ever appended to,
//! except when `enable` strips disable markers:
//!
//! ```text
//! 0cc175b9c0f1b6a831c399e269772661 /repo/.githooks/pre-commit/lint
//! disabled> /repo/.githooks/pre-commit/format
//! ```
//!
//! Lookups are existence based: duplicate lines are harmless.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::HookState;
use crate::error::{HookError, Result};
use crate::fs::{locked_append_line, locked_read, locked_update};

const DISABLED_MARKER: &str = "disabled>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Accepted { hash: String },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub path: PathBuf,
    pub state: EntryState,
}

impl LedgerEntry {
    /// Parse one ledger line; malformed lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (head, path) = line.split_once(' ')?;
        if path.is_empty() {
            return None;
        }
        let state = if head == DISABLED_MARKER {
            EntryState::Disabled
        } else if !head.is_empty() && head.chars().all(|c| c.is_ascii_hexdigit()) {
            EntryState::Accepted {
                hash: head.to_ascii_lowercase(),
            }
        } else {
            return None;
        };
        Some(Self {
            path: PathBuf::from(path),
            state,
        })
    }

    pub fn to_line(&self) -> String {
        match &self.state {
            EntryState::Accepted { hash } => format!("{hash} {}", self.path.display()),
            EntryState::Disabled => format!("{DISABLED_MARKER} {}", self.path.display()),
        }
    }
}

/// Content hash recorded for an accepted hook file (MD5, hex).
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("{:x}", md5::compute(bytes)))
}

#[derive(Debug, Clone)]
pub struct ChecksumLedger {
    file: PathBuf,
    entries: Vec<LedgerEntry>,
}

impl ChecksumLedger {
    /// Load the ledger; a missing file is an empty ledger.
    pub fn load(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();
        let content = locked_read(&file)?;
        let entries = content.lines().filter_map(LedgerEntry::parse).collect();
        Ok(Self { file, entries })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_disabled(&self, path: &Path) -> bool {
        self.entries
            .iter()
            .any(|e| e.path == path && e.state == EntryState::Disabled)
    }

    pub fn is_accepted(&self, path: &Path, hash: &str) -> bool {
        self.entries.iter().any(|e| {
            e.path == path && matches!(&e.state, EntryState::Accepted { hash: h } if h == hash)
        })
    }

    /// Whether the path was ever accepted, under any hash.
    pub fn has_accepted(&self, path: &Path) -> bool {
        self.entries
            .iter()
            .any(|e| e.path == path && matches!(e.state, EntryState::Accepted { .. }))
    }

    pub fn record_accepted(&mut self, path: &Path, hash: &str) -> Result<()> {
        self.append(LedgerEntry {
            path: path.to_path_buf(),
            state: EntryState::Accepted {
                hash: hash.to_string(),
            },
        })
    }

    pub fn record_disabled(&mut self, path: &Path) -> Result<()> {
        self.append(LedgerEntry {
            path: path.to_path_buf(),
            state: EntryState::Disabled,
        })
    }

    /// Remove every disable marker for `path`, rewriting the file.
    ///
    /// Returns whether anything was removed. Nothing is written when no
    /// marker matched, so enabling an enabled hook leaves the file untouched.
    pub fn clear_disabled(&mut self, path: &Path) -> Result<bool> {
        if !self.is_disabled(path) {
            return Ok(false);
        }

        let rewritten = locked_update(&self.file, |content| {
            let mut kept = String::with_capacity(content.len());
            for line in content.lines() {
                let is_marker = matches!(
                    LedgerEntry::parse(line),
                    Some(LedgerEntry { path: p, state: EntryState::Disabled }) if p == path
                );
                if !is_marker {
                    kept.push_str(line);
                    kept.push('\n');
                }
            }
            kept
        })
        .map_err(|source| HookError::LedgerWrite {
            path: self.file.clone(),
            source,
        })?;

        // Lines appended by other writers since load are kept too.
        self.entries = rewritten.lines().filter_map(LedgerEntry::parse).collect();
        debug!(path = %path.display(), "cleared disable markers");
        Ok(true)
    }

    /// Classify `path` given the hash of its current content.
    pub fn classify(&self, path: &Path, current_hash: &str) -> HookState {
        if self.is_disabled(path) {
            HookState::Disabled
        } else if self.is_accepted(path, current_hash) {
            HookState::Active
        } else if self.has_accepted(path) {
            HookState::PendingChanged
        } else {
            HookState::PendingNew
        }
    }

    fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        locked_append_line(&self.file, &entry.to_line()).map_err(|source| {
            HookError::LedgerWrite {
                path: self.file.clone(),
                source,
            }
        })?;
        debug!(line = %entry.to_line(), "ledger append");
        self.entries.push(entry);
        Ok(())
    }
}

//! Repository-wide trust
//!
//! A repository asks to be trusted by committing a `trust-all` marker into
//! its hook root. Whether the user agreed is kept in local git config as
//! `Y` or `N`. Only `marker + Y` bypasses the ledger.

use anyhow::Result;

use crate::config::{keys, ConfigScope, ConfigStore};
use crate::git::RepoContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustState {
    NoMarker,
    /// Marker present, user not asked yet.
    Unset,
    Accepted,
    Declined,
}

impl TrustState {
    pub fn load(repo: &RepoContext, store: &dyn ConfigStore) -> Result<Self> {
        if !repo.trust_marker().is_file() {
            return Ok(Self::NoMarker);
        }
        let scope = ConfigScope::Local(repo.root.clone());
        Ok(match store.get(&scope, keys::TRUST_ALL)?.as_deref() {
            Some(v) if v.trim().eq_ignore_ascii_case("y") => Self::Accepted,
            Some(v) if v.trim().eq_ignore_ascii_case("n") => Self::Declined,
            _ => Self::Unset,
        })
    }

    pub fn is_trusted(self) -> bool {
        self == Self::Accepted
    }

    /// Record the user's answer.
    pub fn record(repo: &RepoContext, store: &dyn ConfigStore, accepted: bool) -> Result<Self> {
        let scope = ConfigScope::Local(repo.root.clone());
        store.set(&scope, keys::TRUST_ALL, if accepted { "Y" } else { "N" })?;
        Ok(if accepted {
            Self::Accepted
        } else {
            Self::Declined
        })
    }

    /// Drop the recorded answer so the user is asked again.
    pub fn forget(repo: &RepoContext, store: &dyn ConfigStore) -> Result<()> {
        store.unset(&ConfigScope::Local(repo.root.clone()), keys::TRUST_ALL)
    }
}

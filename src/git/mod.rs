//! Git access for githooks
//!
//! This module provides:
//! - A runner for the external `git` client, with timeouts for network work
//! - Repository discovery and the well-known paths inside a repository

pub mod repo;
pub mod runner;

pub use repo::RepoContext;
pub use runner::{
    check_git_available, run_git, run_git_checked, run_git_with_timeout,
    TimedOutput, NETWORK_TIMEOUT,
};

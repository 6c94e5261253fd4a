pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod fs;
pub mod git;
pub mod hooks;
pub mod install;
pub mod shared;
pub mod update;

//! One module per CLI command group.

pub mod common;
pub mod install;
pub mod list;
pub mod manage;
pub mod readme;
pub mod run;
pub mod shared;
pub mod trust;
pub mod update;

use anyhow::Result;

use crate::update::CURRENT_VERSION;

pub fn version() -> Result<()> {
    println!("githooks {CURRENT_VERSION}");
    Ok(())
}

use anyhow::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{ConfigScope, ConfigStore};

/// In-memory store used by tests and `--dry-run`.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RefCell<BTreeMap<(ConfigScope, String), Vec<String>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, scope: &ConfigScope, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .borrow()
            .get(&(scope.clone(), key.to_string()))
            .and_then(|v| v.last().cloned()))
    }

    fn get_all(&self, scope: &ConfigScope, key: &str) -> Result<Vec<String>> {
        Ok(self
            .values
            .borrow()
            .get(&(scope.clone(), key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn set(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert((scope.clone(), key.to_string()), vec![value.to_string()]);
        Ok(())
    }

    fn add(&self, scope: &ConfigScope, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .entry((scope.clone(), key.to_string()))
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    fn unset(&self, scope: &ConfigScope, key: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .remove(&(scope.clone(), key.to_string()));
        Ok(())
    }
}

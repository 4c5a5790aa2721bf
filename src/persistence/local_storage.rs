//! Browser LocalStorage backend

use anyhow::{Context, anyhow};
use web_sys::Storage;

use super::KeyValueStore;

/// `window.localStorage` handle
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage. Fails in private modes or sandboxed
    /// frames where storage is disabled.
    pub fn open() -> anyhow::Result<Self> {
        let window = web_sys::window().context("no window")?;
        let storage = window
            .local_storage()
            .map_err(|e| anyhow!("localStorage access denied: {e:?}"))?
            .context("localStorage unavailable")?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| anyhow!("getItem({key}) failed: {e:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| anyhow!("setItem({key}) failed: {e:?}"))
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| anyhow!("removeItem({key}) failed: {e:?}"))
    }
}

use std::sync::Arc;

use crate::{config::StorageConfig, error::Result};

pub mod file;
pub mod keys;
pub mod memory;

pub use file::JsonFileStore;
pub use keys::StorageKey;
pub use memory::MemoryStore;

/// Durable key-value storage for the session keys. Only the session store writes to it.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

pub fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match &config.path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Opening file session storage");
            Ok(Arc::new(JsonFileStore::open(path)?))
        }
        None => Ok(Arc::new(MemoryStore::default())),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use uuid::Uuid;

    use super::*;

    #[test]
    fn no_path_keeps_keys_in_memory() {
        let store = open(&StorageConfig { path: None }).unwrap();
        store.set(StorageKey::TOKEN, "abc").unwrap();
        assert_eq!(store.get(StorageKey::TOKEN).unwrap().as_deref(), Some("abc"));

        let fresh = open(&StorageConfig { path: None }).unwrap();
        assert_eq!(fresh.get(StorageKey::TOKEN).unwrap(), None);
    }

    #[test]
    fn path_opens_a_file_store() {
        let path = env::temp_dir()
            .join(format!("wish-pixels-{}", Uuid::new_v4()))
            .join("session.json");
        let config = StorageConfig {
            path: Some(path.clone()),
        };

        open(&config).unwrap().set(StorageKey::TOKEN, "abc").unwrap();
        assert!(path.exists());

        let reopened = open(&config).unwrap();
        assert_eq!(reopened.get(StorageKey::TOKEN).unwrap().as_deref(), Some("abc"));

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }
}

//! In-memory key-value store.

use async_trait::async_trait;
use dashmap::DashMap;

use super::KeyValueStore;
use crate::error::RelayResult;

/// DashMap-backed store with no durability.
///
/// Useful for tests and for embeddings that keep health state for the
/// lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> RelayResult<Option<String>> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> RelayResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RelayResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryStore::new();

        assert_eq!(store.get("twitter_tokens").await.unwrap(), None);

        store.set("twitter_tokens", "{\"access\":\"abc\"}").await.unwrap();
        assert_eq!(
            store.get("twitter_tokens").await.unwrap().as_deref(),
            Some("{\"access\":\"abc\"}")
        );

        store.delete("twitter_tokens").await.unwrap();
        assert_eq!(store.get("twitter_tokens").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.delete("never_set").await.unwrap();
        assert!(store.is_empty());
    }
}

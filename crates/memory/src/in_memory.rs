//! In-memory archive store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use cogito_core::error::MemoryError;
use cogito_core::memory::{ArchiveKey, ArchiveStore, MemoryEntry};
use dashmap::DashMap;

/// An archive store backed by a concurrent map. Appends are serialized
/// per key by the map's shard locking.
pub struct InMemoryArchive {
    units: DashMap<String, Vec<MemoryEntry>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self {
            units: DashMap::new(),
        }
    }

    /// Number of archive units currently held.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

impl Default for InMemoryArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveStore for InMemoryArchive {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self, key: &ArchiveKey) -> Result<Option<Vec<MemoryEntry>>, MemoryError> {
        Ok(self.units.get(&key.file_stem()).map(|u| u.value().clone()))
    }

    async fn append(&self, key: &ArchiveKey, entry: MemoryEntry) -> Result<(), MemoryError> {
        self.units.entry(key.file_stem()).or_default().push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn append_and_load() {
        let store = InMemoryArchive::new();
        let key = ArchiveKey::new("alice", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());

        assert!(store.load(&key).await.unwrap().is_none());

        store
            .append(&key, MemoryEntry::new("hi", "hello"))
            .await
            .unwrap();

        let entries = store.load(&key).await.unwrap().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user, "hi");
        assert_eq!(store.unit_count(), 1);
    }
}

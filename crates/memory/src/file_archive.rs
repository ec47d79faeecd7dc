//! File-based archive store — one pretty-printed JSON document per
//! `(user, day)` unit.
//!
//! Storage location: `{dir}/{user_id}_{yyyy-mm-dd}.json`. The format is
//! a plain JSON array of entries, human-inspectable and trivially
//! greppable.
//!
//! `append` is a read-modify-write of the whole document, so it holds a
//! per-key async mutex for the duration: two concurrent evictions into
//! the same unit would otherwise lose one of the writes.

use async_trait::async_trait;
use cogito_core::error::MemoryError;
use cogito_core::memory::{ArchiveKey, ArchiveStore, MemoryEntry};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// A file-backed archive store.
pub struct FileArchiveStore {
    dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FileArchiveStore {
    /// Create a store rooted at the given directory. The directory is
    /// created on first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: DashMap::new(),
        }
    }

    /// Default path: `~/.cogito/memory`
    pub fn default_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cogito").join("memory")
    }

    fn path_for(&self, key: &ArchiveKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }

    fn key_lock(&self, key: &ArchiveKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.file_stem())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn read_unit(&self, key: &ArchiveKey) -> Result<Option<Vec<MemoryEntry>>, MemoryError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MemoryError::Storage(format!(
                    "Failed to read archive unit {}: {e}",
                    path.display()
                )));
            }
        };

        let entries: Vec<MemoryEntry> = serde_json::from_str(&content).map_err(|e| {
            MemoryError::Serialization(format!(
                "Corrupt archive unit {}: {e}",
                path.display()
            ))
        })?;

        Ok(Some(entries))
    }

    async fn write_unit(
        &self,
        key: &ArchiveKey,
        entries: &[MemoryEntry],
    ) -> Result<(), MemoryError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            MemoryError::Storage(format!("Failed to create archive directory: {e}"))
        })?;

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| MemoryError::Serialization(e.to_string()))?;

        let path = self.path_for(key);
        tokio::fs::write(&path, content).await.map_err(|e| {
            MemoryError::Storage(format!(
                "Failed to write archive unit {}: {e}",
                path.display()
            ))
        })
    }
}

#[async_trait]
impl ArchiveStore for FileArchiveStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, key: &ArchiveKey) -> Result<Option<Vec<MemoryEntry>>, MemoryError> {
        self.read_unit(key).await
    }

    async fn append(&self, key: &ArchiveKey, entry: MemoryEntry) -> Result<(), MemoryError> {
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        let mut entries = self.read_unit(key).await?.unwrap_or_default();
        entries.push(entry);
        self.write_unit(key, &entries).await?;

        debug!(key = %key, total = entries.len(), "Archive unit updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(user: &str) -> ArchiveKey {
        ArchiveKey::new(user, NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
    }

    fn entry(user_text: &str) -> MemoryEntry {
        MemoryEntry::new(user_text, "a reply")
    }

    #[tokio::test]
    async fn load_missing_unit_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArchiveStore::new(tmp.path());
        assert!(store.load(&key("alice")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn append_creates_unit_and_accumulates() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArchiveStore::new(tmp.path());

        store.append(&key("alice"), entry("first")).await.unwrap();
        store.append(&key("alice"), entry("second")).await.unwrap();

        let entries = store.load(&key("alice")).await.unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user, "first");
        assert_eq!(entries[1].user, "second");

        // Naming matches the {user}_{date}.json convention
        assert!(tmp.path().join("alice_2026-08-06.json").exists());
    }

    #[tokio::test]
    async fn units_are_isolated_per_user() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArchiveStore::new(tmp.path());

        store.append(&key("alice"), entry("hers")).await.unwrap();
        store.append(&key("bob"), entry("his")).await.unwrap();

        assert_eq!(store.load(&key("alice")).await.unwrap().unwrap().len(), 1);
        assert_eq!(store.load(&key("bob")).await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_unit_reports_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArchiveStore::new(tmp.path());

        tokio::fs::write(tmp.path().join("alice_2026-08-06.json"), "not json")
            .await
            .unwrap();

        let err = store.load(&key("alice")).await.unwrap_err();
        assert!(matches!(err, MemoryError::Serialization(_)));
    }

    #[tokio::test]
    async fn concurrent_appends_to_same_unit_lose_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(FileArchiveStore::new(tmp.path()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(&key("alice"), entry(&format!("message {i}")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let entries = store.load(&key("alice")).await.unwrap().unwrap();
        assert_eq!(entries.len(), 10);
    }
}

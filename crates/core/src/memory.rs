//! Memory domain types and the archive persistence surface.
//!
//! Short-term memory is a bounded buffer of recent exchanges; when it
//! overflows, the oldest entries are evicted into a long-term archive
//! partitioned by `(user, calendar day)`. This module defines the entry
//! type, the archive key, and the `ArchiveStore` trait the memory
//! manager writes through.

use crate::error::MemoryError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One remembered exchange: what the user said and what the assistant
/// answered. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// When the exchange happened
    pub timestamp: DateTime<Utc>,

    /// The user's message
    pub user: String,

    /// The assistant's reply
    pub assistant: String,
}

impl MemoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// The calendar day this entry belongs to in the archive.
    pub fn archive_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Identifies one archive unit: all entries for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveKey {
    pub user_id: String,
    pub date: NaiveDate,
}

impl ArchiveKey {
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
        }
    }

    /// Stable storage identifier, e.g. `alice_2026-08-06`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.user_id, self.date.format("%Y-%m-%d"))
    }
}

impl std::fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// The long-term archive persistence surface.
///
/// One value per key, read as a whole and replaced as a whole. A missing
/// unit is `Ok(None)`, not an error. Implementations MUST serialize
/// `append` per key: it is a read-modify-write of the entire unit, and
/// two concurrent appends to the same key would otherwise lose one.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// The store name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Load all entries for a key, or `None` if the unit does not exist.
    async fn load(
        &self,
        key: &ArchiveKey,
    ) -> std::result::Result<Option<Vec<MemoryEntry>>, MemoryError>;

    /// Append one entry to a key's unit, creating the unit if needed.
    async fn append(
        &self,
        key: &ArchiveKey,
        entry: MemoryEntry,
    ) -> std::result::Result<(), MemoryError>;
}

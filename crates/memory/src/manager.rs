//! The tiered memory manager — bounded short-term buffer with FIFO
//! eviction into the day-partitioned archive.
//!
//! One manager exists per user. The short-term tier holds the most
//! recent exchanges and overflows into the archive one entry at a time:
//! each `add_conversation` that pushes the buffer past its threshold
//! synchronously evicts exactly the oldest entry, filed under the
//! ENTRY's own calendar day rather than the day of eviction.
//!
//! This component never raises past its boundary: recall failures come
//! back as descriptive strings, and an archive write failure during
//! eviction is logged and the entry re-queued.

use chrono::NaiveDate;
use cogito_core::memory::{ArchiveKey, ArchiveStore, MemoryEntry};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_THRESHOLD: usize = 10;

/// Per-user tiered conversational memory.
pub struct MemoryManager {
    user_id: String,
    short_term: VecDeque<MemoryEntry>,
    threshold: usize,
    archive: Arc<dyn ArchiveStore>,
}

impl MemoryManager {
    pub fn new(user_id: impl Into<String>, archive: Arc<dyn ArchiveStore>) -> Self {
        let user_id = user_id.into();
        debug!(user = %user_id, threshold = DEFAULT_THRESHOLD, "Memory manager initialized");
        Self {
            user_id,
            short_term: VecDeque::new(),
            threshold: DEFAULT_THRESHOLD,
            archive,
        }
    }

    /// Set the short-term capacity threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current short-term entry count.
    pub fn len(&self) -> usize {
        self.short_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_term.is_empty()
    }

    /// Record one completed exchange.
    pub async fn add_conversation(&mut self, user_text: &str, assistant_text: &str) {
        self.add_entry(MemoryEntry::new(user_text, assistant_text))
            .await;
    }

    /// Record a pre-built entry (the timestamp decides its archive day).
    pub async fn add_entry(&mut self, entry: MemoryEntry) {
        self.short_term.push_back(entry);

        debug!(
            user = %self.user_id,
            count = self.short_term.len(),
            threshold = self.threshold,
            "Conversation added to short-term memory"
        );

        if self.short_term.len() > self.threshold {
            self.evict_oldest().await;
        }
    }

    /// Move the single oldest entry into the long-term archive.
    async fn evict_oldest(&mut self) {
        let Some(oldest) = self.short_term.pop_front() else {
            return;
        };

        let key = ArchiveKey::new(&self.user_id, oldest.archive_date());
        info!(user = %self.user_id, key = %key, "Short-term threshold exceeded, archiving oldest entry");

        if let Err(e) = self.archive.append(&key, oldest.clone()).await {
            // The entry goes back to the buffer front so nothing is lost;
            // the next overflow will retry the write.
            warn!(user = %self.user_id, error = %e, "Archive write failed, re-queuing entry");
            self.short_term.push_front(oldest);
        }
    }

    /// Render the short-term tier as alternating `Human:`/`Assistant:`
    /// lines, oldest first.
    pub fn get_chat_history(&self) -> String {
        let mut lines = Vec::with_capacity(self.short_term.len() * 2);
        for entry in &self.short_term {
            lines.push(format!("Human: {}", entry.user));
            lines.push(format!("Assistant: {}", entry.assistant));
        }
        lines.join("\n")
    }

    /// Recall archived memories from a specific date.
    ///
    /// Always returns a string: invalid dates, missing units, and read
    /// failures all come back as descriptive messages.
    pub async fn recall_memory(&self, year: i32, month: u32, day: u32) -> String {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return format!(
                "Error: Invalid date provided: {year}-{month}-{day}. \
                 Please provide a valid year, month (1-12), and day."
            );
        };

        let key = ArchiveKey::new(&self.user_id, date);
        debug!(user = %self.user_id, key = %key, "Memory recall requested");

        let entries = match self.archive.load(&key).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                return format!("No memory file found for the date: {}", date.format("%Y-%m-%d"));
            }
            Err(e) => {
                warn!(user = %self.user_id, error = %e, "Memory recall failed");
                return format!("An unexpected error occurred while recalling memory: {e}");
            }
        };

        if entries.is_empty() {
            return format!("No memories found for {}", date.format("%Y-%m-%d"));
        }

        let mut lines = Vec::with_capacity(entries.len() * 3);
        for entry in &entries {
            lines.push(format!("[{}]", entry.timestamp.format("%Y-%m-%d %H:%M:%S")));
            lines.push(format!("Human: {}", entry.user));
            lines.push(format!("Assistant: {}", entry.assistant));
        }
        lines.join("\n")
    }
}

//! Tiered conversational memory for Cogito.
//!
//! Two tiers per user: a bounded in-memory buffer of recent exchanges,
//! and an unbounded archive partitioned by calendar day that the buffer
//! overflows into, one entry at a time.

pub mod file_archive;
pub mod in_memory;
pub mod manager;

pub use file_archive::FileArchiveStore;
pub use in_memory::InMemoryArchive;
pub use manager::MemoryManager;

//! # Cogito Core
//!
//! Domain types, traits, and error definitions for the Cogito
//! conversational agent runtime. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod memory;
pub mod provider;
pub mod tool;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, ParseError, ProviderError, Result, ToolError};
pub use memory::{ArchiveKey, ArchiveStore, MemoryEntry};
pub use provider::{CompletionBackend, CompletionRequest, CompletionResponse, Usage};
pub use tool::{DuplicatePolicy, Scalar, Tool, ToolOutput, ToolParams, ToolRegistry};
pub use turn::{ConversationTurn, Role};

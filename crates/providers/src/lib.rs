//! LLM completion backends for Cogito.
//!
//! All backends implement the `cogito_core::CompletionBackend` trait.
//! The `ModelHub` sits above them and owns model-tier selection and the
//! single-shot fallback policy — the reasoning loop never sees model
//! names or retry logic.

pub mod hub;
pub mod openai_compat;

pub use hub::ModelHub;
pub use openai_compat::OpenAiCompatBackend;

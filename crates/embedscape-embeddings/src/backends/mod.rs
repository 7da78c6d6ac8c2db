//! Embedding backend implementations.
//!
//! Remote backends are feature-gated and can be enabled independently.
//!
//! # Available Backends
//! - `openai` - OpenAI-compatible `/v1/embeddings` API

#![cfg_attr(not(feature = "openai"), allow(dead_code, unused_imports))]

mod common;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{openai_embedder, DEFAULT_OPENAI_API_BASE};

pub use common::provider_error_message;

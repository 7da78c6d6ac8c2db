//! Text embedding backends for embedscape.

pub mod backends;
pub mod config;
pub mod embedder;
pub mod hash;

pub use embedder::{failed_request_id, Embedder, EmbeddingProfile, ProviderError, ProviderInfo};

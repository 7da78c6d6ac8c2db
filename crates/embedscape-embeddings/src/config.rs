use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::embedder::Embedder;
use crate::hash::{HashEmbedder, DEFAULT_HASH_DIM};

pub const DEFAULT_BACKEND: &str = "openai";
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A partial set of embedding options, as read from a config file or CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingOptionsPatch {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub dim: Option<usize>,
    pub api_base: Option<String>,
    /// Name of the environment variable that holds the provider API key.
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl EmbeddingOptionsPatch {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
    }

    /// Fields set on `higher` win.
    pub fn overlay(self, higher: Self) -> Self {
        Self {
            backend: higher.backend.or(self.backend),
            model: higher.model.or(self.model),
            dim: higher.dim.or(self.dim),
            api_base: higher.api_base.or(self.api_base),
            api_key_env: higher.api_key_env.or(self.api_key_env),
            timeout_secs: higher.timeout_secs.or(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingOptions {
    pub backend: String,
    pub model: Option<String>,
    pub dim: Option<usize>,
    pub api_base: Option<String>,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self::resolve(&[])
    }
}

impl EmbeddingOptions {
    /// Rolls up patches ordered low to high priority.
    pub fn resolve(patches_low_to_high: &[EmbeddingOptionsPatch]) -> Self {
        let merged = patches_low_to_high
            .iter()
            .cloned()
            .fold(EmbeddingOptionsPatch::default(), EmbeddingOptionsPatch::overlay);
        Self {
            backend: merged.backend.unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
            model: merged.model,
            dim: merged.dim,
            api_base: merged.api_base,
            api_key_env: merged
                .api_key_env
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            timeout_secs: merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.backend != "hash"
    }

    /// Reads the API key named by `api_key_env`. Called once at startup; the
    /// key is then handed to the backend explicitly.
    pub fn api_key_from_env(&self) -> anyhow::Result<String> {
        std::env::var(&self.api_key_env)
            .with_context(|| format!("missing required env var {}", self.api_key_env))
    }

    pub fn into_embedder(
        self,
        api_key: Option<String>,
    ) -> anyhow::Result<Box<dyn Embedder + Send + Sync>> {
        match self.backend.as_str() {
            "hash" => Ok(Box::new(HashEmbedder::new(
                self.dim.unwrap_or(DEFAULT_HASH_DIM),
            ))),
            "openai" => {
                #[cfg(feature = "openai")]
                {
                    let api_key = api_key
                        .ok_or_else(|| anyhow::anyhow!("openai backend requires an API key"))?;
                    crate::backends::openai_embedder(
                        self.dim,
                        self.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL),
                        self.api_base.as_deref(),
                        api_key,
                        std::time::Duration::from_secs(self.timeout_secs),
                    )
                }
                #[cfg(not(feature = "openai"))]
                {
                    let _ = api_key;
                    anyhow::bail!(
                        "embedding backend \"openai\" is not enabled in this build (rebuild with cargo feature \"embedscape-embeddings/openai\")"
                    )
                }
            }
            other => anyhow::bail!(
                "unknown embedding backend {other:?} (supported: \"hash\", \"openai\")"
            ),
        }
    }
}

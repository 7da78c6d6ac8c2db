use std::time::Duration;

use anyhow::Context;

use super::common::{ensure_dim, provider_error_message};
use crate::embedder::{Embedder, EmbeddingProfile, ProviderError, ProviderInfo};

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com";

/// Builds an OpenAI embedder. The API key is passed in by the caller; this
/// function never reads the environment.
pub fn openai_embedder(
    dim: Option<usize>,
    model: &str,
    api_base: Option<&str>,
    api_key: String,
    timeout: Duration,
) -> anyhow::Result<Box<dyn Embedder + Send + Sync>> {
    if api_key.trim().is_empty() {
        anyhow::bail!("openai backend requires a non-empty API key");
    }
    let api_base = api_base.unwrap_or(DEFAULT_OPENAI_API_BASE);
    Ok(Box::new(OpenAiEmbedder::new(
        dim, model, api_base, api_key, timeout,
    )))
}

struct OpenAiEmbedder {
    profile: EmbeddingProfile,
    api_base: String,
    api_key: String,
    agent: ureq::Agent,
}

impl OpenAiEmbedder {
    fn new(
        dim: Option<usize>,
        model: &str,
        api_base: &str,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            profile: EmbeddingProfile {
                backend: "openai".to_string(),
                model: Some(model.to_string()),
                dim,
            },
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Embedder for OpenAiEmbedder {
    fn profile(&self) -> &EmbeddingProfile {
        &self.profile
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            api_base: Some(self.api_base.clone()),
        }
    }

    fn embed(&self, inputs: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let model = self
            .profile
            .model
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("openai embedder missing model"))?;
        let url = format!("{}/v1/embeddings", self.api_base);
        tracing::debug!(%url, model, input_count = inputs.len(), "openai embeddings request");

        let response = match self
            .agent
            .post(&url)
            .set("authorization", &format!("Bearer {}", self.api_key))
            .set("content-type", "application/json")
            .send_json(serde_json::json!({ "model": model, "input": inputs }))
        {
            Ok(r) => r,
            Err(ureq::Error::Status(status, resp)) => {
                let request_id = resp.header("x-request-id").map(str::to_string);
                let body = resp.into_string().unwrap_or_default();
                return Err(ProviderError {
                    backend: "openai".to_string(),
                    status,
                    request_id,
                    message: provider_error_message(&body),
                }
                .into());
            }
            Err(err) => return Err(err).context("openai embeddings request"),
        };

        tracing::debug!(
            request_id = response.header("x-request-id").unwrap_or("-"),
            processing_ms = response.header("openai-processing-ms").unwrap_or("-"),
            "openai embeddings response"
        );

        let raw: serde_json::Value = response
            .into_json()
            .context("parse openai embeddings response")?;
        parse_embeddings_response(&raw, self.profile.dim)
    }
}

/// Reads `data[].embedding`, ordered by `data[].index` when present.
fn parse_embeddings_response(
    raw: &serde_json::Value,
    dim: Option<usize>,
) -> anyhow::Result<Vec<Vec<f32>>> {
    let data = raw
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("openai response missing data[]"))?;
    let mut indexed = Vec::with_capacity(data.len());
    for (pos, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(pos);
        let emb = item
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("openai response item missing embedding[]"))?;
        let mut vec = Vec::with_capacity(emb.len());
        for f in emb {
            #[allow(clippy::cast_possible_truncation)]
            vec.push(
                f.as_f64()
                    .ok_or_else(|| anyhow::anyhow!("openai embedding contains non-number"))?
                    as f32,
            );
        }
        ensure_dim(dim, vec.len(), "openai")?;
        indexed.push((index, vec));
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

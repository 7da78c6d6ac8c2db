use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What a backend produces: which provider, which model, how many components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingProfile {
    pub backend: String,
    pub model: Option<String>,
    /// Expected vector length. `None` accepts whatever the provider returns.
    pub dim: Option<usize>,
}

impl EmbeddingProfile {
    /// `backend` or `backend/model`, for log lines.
    pub fn label(&self) -> String {
        match &self.model {
            Some(model) => format!("{}/{model}", self.backend),
            None => self.backend.clone(),
        }
    }
}

/// Provider details for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// A provider answered with an error status. Travels inside the `anyhow`
/// error returned by [`Embedder::embed`]; transport failures never carry one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{backend} returned HTTP {status}: {message}")]
pub struct ProviderError {
    pub backend: String,
    pub status: u16,
    /// The provider's `x-request-id` for the failed call, if it sent one.
    pub request_id: Option<String>,
    pub message: String,
}

/// Request id of the provider call behind `err`, if any.
pub fn failed_request_id(err: &anyhow::Error) -> Option<&str> {
    err.downcast_ref::<ProviderError>()
        .and_then(|e| e.request_id.as_deref())
}

/// Turns text into vectors. Implementations must return one vector per input,
/// in input order.
pub trait Embedder {
    fn profile(&self) -> &EmbeddingProfile;

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::default()
    }

    fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>>;
}

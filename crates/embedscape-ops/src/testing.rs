use std::sync::Mutex;

use embedscape_core::Record;
use embedscape_embeddings::{Embedder, EmbeddingProfile};

pub(crate) fn record(id: &str, country: &str, field: &str) -> Record {
    Record {
        id: id.to_string(),
        name: format!("User {id}"),
        headshot: String::new(),
        country: country.to_string(),
        field_of_study: field.to_string(),
        interests: "Reading".to_string(),
        impact: "Education".to_string(),
    }
}

pub(crate) fn records() -> Vec<Record> {
    vec![
        record("1", "Kenya", "Physics"),
        record("2", "Peru", "Biology"),
        record("3", "Japan", "Physics"),
    ]
}

/// Records every input and answers with a vector derived from the text.
pub(crate) struct StubEmbedder {
    profile: EmbeddingProfile,
    seen: Mutex<Vec<String>>,
    fail_on: Option<(String, String)>,
    empty: bool,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            profile: EmbeddingProfile {
                backend: "stub".to_string(),
                model: None,
                dim: Some(4),
            },
            seen: Mutex::new(Vec::new()),
            fail_on: None,
            empty: false,
        }
    }
}

impl StubEmbedder {
    pub(crate) fn failing_on(text: &str, message: &str) -> Self {
        Self {
            fail_on: Some((text.to_string(), message.to_string())),
            ..Self::default()
        }
    }

    pub(crate) fn returning_nothing() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn vector_for(text: &str) -> Vec<f32> {
        let n = text.len() as f32;
        vec![n, -n, n / 2.0, 1.0]
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("poisoned mutex").clone()
    }
}

impl Embedder for StubEmbedder {
    fn profile(&self) -> &EmbeddingProfile {
        &self.profile
    }

    fn embed(&self, inputs: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.seen
            .lock()
            .expect("poisoned mutex")
            .extend(inputs.iter().cloned());
        if self.empty {
            return Ok(Vec::new());
        }
        if let Some((text, message)) = &self.fail_on {
            if inputs.iter().any(|i| i == text) {
                anyhow::bail!("{message}");
            }
        }
        Ok(inputs.iter().map(|s| Self::vector_for(s)).collect())
    }
}

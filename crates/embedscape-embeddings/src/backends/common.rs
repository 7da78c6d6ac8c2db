//! Shared utility functions used across remote embedding backends.

#[cfg(feature = "openai")]
pub(super) fn ensure_dim(expected: Option<usize>, got: usize, backend: &str) -> anyhow::Result<()> {
    match expected {
        Some(expected) if expected != got => {
            anyhow::bail!("{backend} embedder dimension mismatch (expected {expected}, got {got})")
        }
        _ => Ok(()),
    }
}

/// Pulls the human-readable message out of a provider error body.
///
/// Accepts `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned trimmed as-is.
pub fn provider_error_message(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };
    let msg = v
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .or_else(|| v.get("message").and_then(|m| m.as_str()));
    match msg {
        Some(m) => m.to_string(),
        None => trimmed.to_string(),
    }
}

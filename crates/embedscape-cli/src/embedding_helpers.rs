use anyhow::Context;
use std::path::Path;

use embedscape_embeddings::config::{EmbeddingOptions, EmbeddingOptionsPatch};
use embedscape_embeddings::Embedder;

use crate::cli::EmbeddingArgs;

/// Resolves embedding options from `--config` and flags (flags win).
pub(crate) fn resolve_options(args: &EmbeddingArgs) -> anyhow::Result<EmbeddingOptions> {
    let mut patches = Vec::with_capacity(2);
    if let Some(path) = args.config.as_deref() {
        patches.push(
            EmbeddingOptionsPatch::from_json_file(Path::new(path)).context("load --config")?,
        );
    }
    patches.push(args.to_patch());
    Ok(EmbeddingOptions::resolve(&patches))
}

/// Creates the embedder, reading the provider API key from the environment
/// once and handing it to the backend.
pub(crate) fn create_embedder(
    args: &EmbeddingArgs,
) -> anyhow::Result<Box<dyn Embedder + Send + Sync>> {
    let options = resolve_options(args)?;
    let api_key = if options.requires_api_key() {
        Some(options.api_key_from_env()?)
    } else {
        None
    };
    tracing::debug!(backend = %options.backend, model = ?options.model, "resolved embedding options");
    options
        .into_embedder(api_key)
        .context("resolve embedder from options")
}

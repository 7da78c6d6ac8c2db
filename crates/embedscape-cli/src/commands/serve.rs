use embedscape_core::check_scale;
use embedscape_web::ServerConfig;

use crate::cli::EmbeddingArgs;
use crate::embedding_helpers::create_embedder;

pub(crate) fn cmd_serve(
    data: &str,
    bind: &str,
    fallback_image: Option<&str>,
    scale: f32,
    embedding: &EmbeddingArgs,
) -> anyhow::Result<()> {
    check_scale(scale)?;
    let embedder = create_embedder(embedding)?;
    let mut config = ServerConfig::new(data);
    config.bind = bind.to_string();
    config.default_scale = scale;
    if let Some(url) = fallback_image {
        config.fallback_image = url.to_string();
    }
    embedscape_web::serve(config, embedder)
}

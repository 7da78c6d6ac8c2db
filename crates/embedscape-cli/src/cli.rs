use clap::{Args, Parser, Subcommand};

use embedscape_embeddings::config::EmbeddingOptionsPatch;

#[derive(Parser)]
#[command(
    name = "embedscape",
    version,
    about = "Embed user records and place them in a 3D scene.",
    long_about = "Embed user records and place them in a 3D scene.\n\nNotes:\n  - Each record's selected attribute is sent to the embedding provider, one request per record.\n  - The first three embedding components are rescaled per axis into [-scale/2, +scale/2].\n  - The `hash` backend is deterministic and offline; it carries no semantic meaning."
)]
pub(crate) struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(flatten)]
    pub(crate) embedding: EmbeddingArgs,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

/// Embedding provider flags. Override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct EmbeddingArgs {
    /// JSON file with embedding options (`backend`, `model`, `dim`, `api_base`, `api_key_env`, `timeout_secs`).
    #[arg(long, global = true)]
    pub(crate) config: Option<String>,
    /// Embedding backend: `openai` or `hash`.
    #[arg(long, global = true)]
    pub(crate) backend: Option<String>,
    /// Provider model id (default `text-embedding-3-small`).
    #[arg(long, global = true)]
    pub(crate) model: Option<String>,
    /// Expected embedding dimension (also the `hash` backend's output size).
    #[arg(long, global = true)]
    pub(crate) dim: Option<usize>,
    /// Provider base URL, e.g. `https://api.openai.com`.
    #[arg(long, global = true)]
    pub(crate) api_base: Option<String>,
    /// Environment variable holding the provider API key.
    #[arg(long, global = true)]
    pub(crate) api_key_env: Option<String>,
    /// Per-request provider timeout in seconds.
    #[arg(long, global = true)]
    pub(crate) timeout_secs: Option<u64>,
}

impl EmbeddingArgs {
    pub(crate) fn to_patch(&self) -> EmbeddingOptionsPatch {
        EmbeddingOptionsPatch {
            backend: self.backend.clone(),
            model: self.model.clone(),
            dim: self.dim,
            api_base: self.api_base.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Serve the JSON API and the 3D scene page.
    Serve {
        /// CSV dataset (read on every request).
        #[arg(long, default_value = "data/grid.csv")]
        data: String,
        /// Bind address, e.g. `127.0.0.1:3000`.
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
        /// Image URL used for records without a headshot link.
        #[arg(long)]
        fallback_image: Option<String>,
        /// Default scene scale for `/api/positions`.
        #[arg(long, default_value_t = 100.0)]
        scale: f32,
    },
    /// Embed the selected attribute of every record and print the records.
    Embed {
        /// CSV dataset.
        #[arg(long, default_value = "data/grid.csv")]
        data: String,
        /// Attribute to embed: `Country`, `Field of Study`, `Interests` or `Impact`.
        #[arg(long, default_value = "Country")]
        criteria: String,
    },
    /// Embed and normalize, printing each record's scene position.
    Layout {
        /// CSV dataset.
        #[arg(long, default_value = "data/grid.csv")]
        data: String,
        /// Attribute to embed: `Country`, `Field of Study`, `Interests` or `Impact`.
        #[arg(long, default_value = "Country")]
        criteria: String,
        /// Output range is `[-scale/2, +scale/2]` on every axis.
        #[arg(long, default_value_t = 100.0)]
        scale: f32,
    },
    /// List the valid criteria names.
    Criteria,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_parses_defaults() {
        let cli = Cli::try_parse_from(["embedscape", "serve"]).expect("parse should succeed");
        match cli.cmd {
            Command::Serve {
                data,
                bind,
                fallback_image,
                scale,
            } => {
                assert_eq!(data, "data/grid.csv");
                assert_eq!(bind, "127.0.0.1:3000");
                assert_eq!(fallback_image, None);
                assert_eq!(scale, 100.0);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn layout_accepts_multi_word_criteria() {
        let cli = Cli::try_parse_from([
            "embedscape",
            "layout",
            "--criteria",
            "Field of Study",
            "--scale",
            "20",
        ])
        .expect("parse should succeed");
        match cli.cmd {
            Command::Layout {
                criteria, scale, ..
            } => {
                assert_eq!(criteria, "Field of Study");
                assert_eq!(scale, 20.0);
            }
            _ => panic!("expected layout command"),
        }
    }

    #[test]
    fn embedding_flags_are_global() {
        let cli = Cli::try_parse_from([
            "embedscape",
            "embed",
            "--backend",
            "hash",
            "--dim",
            "8",
            "--json",
        ])
        .expect("parse should succeed");
        assert!(cli.json);
        let patch = cli.embedding.to_patch();
        assert_eq!(patch.backend.as_deref(), Some("hash"));
        assert_eq!(patch.dim, Some(8));
        assert_eq!(patch.model, None);
    }
}

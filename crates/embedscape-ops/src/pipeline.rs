use std::path::Path;

use embedscape_core::{check_scale, normalize, Dataset, EmbeddedRecord, Error, PlacedRecord, Record};
use embedscape_embeddings::Embedder;

use crate::fetch::fetch_embeddings;

/// fetch → validate → normalize, for an already loaded record set.
///
/// The scale is checked before any provider request is made.
pub fn layout(
    records: Vec<Record>,
    criteria: &str,
    embedder: &dyn Embedder,
    scale: f32,
) -> Result<Vec<PlacedRecord>, Error> {
    check_scale(scale)?;
    let embedded = fetch_embeddings(records, criteria, embedder)?;
    Ok(normalize(embedded, scale)?)
}

/// Reads the dataset in full and embeds it.
pub fn embed_dataset(
    path: &Path,
    criteria: &str,
    embedder: &dyn Embedder,
) -> Result<Vec<EmbeddedRecord>, Error> {
    let dataset = Dataset::load(path)?;
    tracing::debug!(path = %path.display(), records = dataset.len(), "dataset loaded");
    Ok(fetch_embeddings(dataset.into_records(), criteria, embedder)?)
}

/// Reads the dataset in full, embeds it and places every record.
pub fn layout_dataset(
    path: &Path,
    criteria: &str,
    embedder: &dyn Embedder,
    scale: f32,
) -> Result<Vec<PlacedRecord>, Error> {
    let dataset = Dataset::load(path)?;
    tracing::debug!(path = %path.display(), records = dataset.len(), "dataset loaded");
    layout(dataset.into_records(), criteria, embedder, scale)
}

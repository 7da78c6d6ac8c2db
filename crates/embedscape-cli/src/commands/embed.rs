use std::path::Path;

use embedscape_core::{Criteria, EmbeddedRecord};

use crate::cli::EmbeddingArgs;
use crate::embedding_helpers::create_embedder;

pub(crate) fn cmd_embed(
    data: &str,
    criteria: &str,
    embedding: &EmbeddingArgs,
    json: bool,
) -> anyhow::Result<()> {
    let embedder = create_embedder(embedding)?;
    let embedded = embedscape_ops::embed_dataset(Path::new(data), criteria, embedder.as_ref())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&embedded)?);
        return Ok(());
    }
    // Already validated by the fetch step.
    let selected: Criteria = criteria.parse()?;
    print_table(&embedded, selected);
    Ok(())
}

fn print_table(records: &[EmbeddedRecord], criteria: Criteria) {
    let name_w = records
        .iter()
        .map(|r| r.record.name.len())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    println!("{:<8}  {:<name_w$}  {:>4}  {}", "id", "Name", "dim", criteria);
    for r in records {
        println!(
            "{:<8}  {:<name_w$}  {:>4}  {}",
            r.record.id,
            r.record.name,
            r.embedding.len(),
            r.record.attribute(criteria)
        );
    }
}

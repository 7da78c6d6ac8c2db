use std::path::Path;

use embedscape_core::PlacedRecord;

use crate::cli::EmbeddingArgs;
use crate::embedding_helpers::create_embedder;
use crate::types::LayoutEntryJson;

pub(crate) fn cmd_layout(
    data: &str,
    criteria: &str,
    scale: f32,
    embedding: &EmbeddingArgs,
    json: bool,
) -> anyhow::Result<()> {
    let embedder = create_embedder(embedding)?;
    let placed =
        embedscape_ops::layout_dataset(Path::new(data), criteria, embedder.as_ref(), scale)?;
    if json {
        let out: Vec<LayoutEntryJson<'_>> = placed.iter().map(LayoutEntryJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    print_table(&placed);
    Ok(())
}

fn print_table(placed: &[PlacedRecord]) {
    let name_w = placed
        .iter()
        .map(|p| p.record.name.len())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    println!(
        "{:<8}  {:<name_w$}  {:>9}  {:>9}  {:>9}",
        "id", "Name", "x", "y", "z"
    );
    for p in placed {
        let [x, y, z] = p.position;
        println!(
            "{:<8}  {:<name_w$}  {x:>9.3}  {y:>9.3}  {z:>9.3}",
            p.record.id, p.record.name
        );
    }
}

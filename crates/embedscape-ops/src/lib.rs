pub mod fetch;
pub mod pipeline;

#[cfg(test)]
mod testing;

pub use fetch::fetch_embeddings;
pub use pipeline::{embed_dataset, layout, layout_dataset};

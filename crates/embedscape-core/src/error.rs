use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("open dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse dataset: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No users found in CSV.")]
    NoData,

    #[error("Invalid criteria {requested:?}. Available criteria: {}", valid.join(", "))]
    InvalidCriteria {
        requested: String,
        valid: Vec<String>,
    },

    #[error("embedding request failed for record {id:?} (index {index}): {message}")]
    Provider {
        index: usize,
        id: String,
        message: String,
    },

    #[error("provider returned no embedding for record {id:?} (index {index})")]
    MissingEmbedding { index: usize, id: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f32),

    #[error("embedding at index {index} has {len} components, need at least 3")]
    TooFewComponents { index: usize, len: usize },
}

//! Core data structures for embedscape.
//!
//! This crate defines the user records loaded from the CSV dataset, the
//! attribute selection (`Criteria`), the coordinate normalizer, and the
//! error types shared by the rest of the workspace.

pub mod dataset;
pub mod error;
pub mod normalize;
pub mod types;

pub use dataset::Dataset;
pub use error::{DatasetError, Error, FetchError, NormalizeError};
pub use normalize::{check_scale, normalize, AxisBounds, DEFAULT_SCALE};
pub use types::{Criteria, EmbeddedRecord, PlacedRecord, Record};

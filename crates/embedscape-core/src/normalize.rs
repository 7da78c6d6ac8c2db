//! Maps the first three embedding components of each record into scene
//! coordinates.
//!
//! Each axis is rescaled independently from the observed `[min, max]` of the
//! current record set to `[-scale/2, +scale/2]`. An axis whose values are all
//! equal collapses to `0` for every record.

use serde::Serialize;

use crate::error::NormalizeError;
use crate::types::{EmbeddedRecord, PlacedRecord};

pub const DEFAULT_SCALE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    const EMPTY: Self = Self {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    fn include(&mut self, v: f32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// Linear map of `v` into `[-scale/2, +scale/2]`.
    ///
    /// Computed in `f64`: `max - min` overflows `f32` for wide finite ranges.
    #[allow(clippy::cast_possible_truncation)]
    pub fn rescale(self, v: f32, scale: f32) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        let (v, min, max) = (f64::from(v), f64::from(self.min), f64::from(self.max));
        let scale = f64::from(scale);
        ((v - min) / (max - min) * scale - scale / 2.0) as f32
    }
}

/// Per-axis bounds over components 0, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub x: Range,
    pub y: Range,
    pub z: Range,
}

impl AxisBounds {
    /// Returns `None` for an empty input.
    pub fn from_vectors<'a, I>(vectors: I) -> Result<Option<Self>, NormalizeError>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut bounds = Self {
            x: Range::EMPTY,
            y: Range::EMPTY,
            z: Range::EMPTY,
        };
        let mut seen = false;
        for (index, v) in vectors.into_iter().enumerate() {
            let [x, y, z] = leading_xyz(index, v)?;
            bounds.x.include(x);
            bounds.y.include(y);
            bounds.z.include(z);
            seen = true;
        }
        Ok(seen.then_some(bounds))
    }

    pub fn position(&self, xyz: [f32; 3], scale: f32) -> [f32; 3] {
        [
            self.x.rescale(xyz[0], scale),
            self.y.rescale(xyz[1], scale),
            self.z.rescale(xyz[2], scale),
        ]
    }
}

fn leading_xyz(index: usize, v: &[f32]) -> Result<[f32; 3], NormalizeError> {
    match v {
        [x, y, z, ..] => Ok([*x, *y, *z]),
        _ => Err(NormalizeError::TooFewComponents {
            index,
            len: v.len(),
        }),
    }
}

pub fn check_scale(scale: f32) -> Result<(), NormalizeError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(NormalizeError::InvalidScale(scale))
    }
}

/// Places every record, preserving input order.
pub fn normalize(
    records: Vec<EmbeddedRecord>,
    scale: f32,
) -> Result<Vec<PlacedRecord>, NormalizeError> {
    check_scale(scale)?;
    let Some(bounds) = AxisBounds::from_vectors(records.iter().map(|r| r.embedding.as_slice()))?
    else {
        return Ok(Vec::new());
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            let xyz = leading_xyz(index, &r.embedding)?;
            Ok(PlacedRecord {
                position: bounds.position(xyz, scale),
                record: r.record,
                embedding: r.embedding,
            })
        })
        .collect()
}

use anyhow::Result;

use crate::embedder::{Embedder, EmbeddingProfile};

pub const DEFAULT_HASH_DIM: usize = 16;

/// Deterministic bag-of-tokens embedder. Useful offline; carries no
/// semantic meaning.
pub struct HashEmbedder {
    profile: EmbeddingProfile,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            profile: EmbeddingProfile {
                backend: "hash".to_string(),
                model: None,
                dim: Some(dim),
            },
        }
    }

    fn dim(&self) -> usize {
        self.profile.dim.unwrap_or(DEFAULT_HASH_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn profile(&self) -> &EmbeddingProfile {
        &self.profile
    }

    fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(inputs.iter().map(|s| hash_embed(s, self.dim())).collect())
    }
}

pub fn hash_embed(text: &str, dim: usize) -> Vec<f32> {
    if dim == 0 {
        return Vec::new();
    }

    let mut v = vec![0.0f32; dim];
    for token in text.split_whitespace() {
        let token = token.to_lowercase();
        let h = fnv1a32(token.as_bytes());
        let idx = (h as usize) % dim;
        let sign = if (h & 0x8000_0000) != 0 { -1.0 } else { 1.0 };
        v[idx] += sign;
    }

    l2_normalize(&mut v);
    v
}

fn fnv1a32(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 0x811c9dc5;
    const PRIME: u32 = 0x0100_0193;
    let mut h = OFFSET;
    for &b in bytes {
        h ^= u32::from(b);
        h = h.wrapping_mul(PRIME);
    }
    h
}

fn l2_normalize(v: &mut [f32]) {
    let sum: f32 = v.iter().map(|x| x * x).sum();
    if sum == 0.0 {
        return;
    }
    let inv = 1.0 / sum.sqrt();
    for x in v.iter_mut() {
        *x *= inv;
    }
}

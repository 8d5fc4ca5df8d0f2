//! topicvec-model
//!
//! Local stand-ins for the external collaborators of the pipeline: a
//! hashing document embedder, a category-supervised topic model and a seeded
//! random projection reducer. None of them trains anything; they exist so the
//! pipeline can run end to end and be tested deterministically.
pub mod category;
pub mod keywords;
pub mod projection;

use std::hash::{Hash, Hasher};

use topicvec_core::corpus::tokenize;
use topicvec_core::traits::Embedder;
use topicvec_core::vector::{l2_norm, NORM_EPSILON};
use topicvec_core::Result;
use twox_hash::XxHash64;

pub use category::CategoryTopicModel;
pub use projection::RandomProjection;

/// Signed feature hashing of word tokens into `dim` buckets, L2-normalized.
///
/// Deterministic for a given input; texts without any word token map to
/// the zero vector.
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f64> {
        let mut v = vec![0f64; self.dim];
        for token in tokenize(text, 1) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
            let weight = 0.5 + f64::from((h >> 32) as u32) / f64::from(u32::MAX);
            v[idx] += sign * weight;
        }
        let norm = l2_norm(&v);
        if norm > NORM_EPSILON { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

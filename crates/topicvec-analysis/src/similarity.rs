//! Interest scores: the dot product of unit vectors, i.e. cosine similarity.
//!
//! Inputs are normalized here rather than trusted to be unit length, and
//! every reported value is clamped to `[-1, 1]` to absorb rounding drift.

use topicvec_core::types::{Relationship, SimilarityPair};
use topicvec_core::vector::{check_dim, dot, normalize};
use topicvec_core::{Error, Result};

pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Cosine similarity of `a` and `b`. Zero vectors are rejected.
pub fn score(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dim(a.len(), b.len())?;
    let ua = normalize(a, "left operand")?;
    // identical inputs are exactly self-similar
    if a == b {
        return Ok(1.0);
    }
    let ub = normalize(b, "right operand")?;
    Ok(clamp_unit(dot(&ua, &ub)?))
}

/// Symmetric `n x n` similarity matrix with a unit diagonal. Cells come
/// from [`score`], so identical rows under different labels read exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize { self.labels.len() }

    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }
}

pub fn pairwise_matrix(vectors: &[Vec<f64>], labels: &[String]) -> Result<SimilarityMatrix> {
    if vectors.len() != labels.len() {
        return Err(Error::malformed("similarity input", format!("{} vectors but {} labels", vectors.len(), labels.len())));
    }
    let n = vectors.len();
    let dim = vectors.first().map_or(0, Vec::len);
    for (v, label) in vectors.iter().zip(labels) {
        check_dim(dim, v.len())?;
        normalize(v, label)?;
    }

    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let s = score(&vectors[i], &vectors[j])?;
            values[i][j] = s;
            values[j][i] = s;
        }
    }
    Ok(SimilarityMatrix { labels: labels.to_vec(), values })
}

/// Each unordered pair `i < j` of the matrix with its relationship class.
pub fn labeled_pairs(matrix: &SimilarityMatrix) -> Vec<SimilarityPair> {
    let n = matrix.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(SimilarityPair {
                name_a: matrix.labels[i].clone(),
                name_b: matrix.labels[j].clone(),
                similarity: matrix.values[i][j],
                relationship: Relationship::classify(&matrix.labels[i], &matrix.labels[j]),
            });
        }
    }
    pairs
}

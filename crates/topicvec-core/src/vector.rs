//! Dense vector helpers used across the workspace.
//!
//! Everything works on plain `&[f64]` rows so callers can keep their own
//! storage layout.

use crate::error::{Error, Result};

/// Norms at or below this are treated as zero.
pub const NORM_EPSILON: f64 = 1e-12;

pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dim(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

pub fn check_dim(expected: usize, actual: usize) -> Result<()> {
    if expected == actual { Ok(()) } else { Err(Error::DimensionMismatch { expected, actual }) }
}

/// Divide `v` by its Euclidean norm. `label` names the vector in the error.
pub fn normalize(v: &[f64], label: &str) -> Result<Vec<f64>> {
    let norm = l2_norm(v);
    if !norm.is_finite() || norm <= NORM_EPSILON {
        return Err(Error::DegenerateVector(label.to_string()));
    }
    Ok(v.iter().map(|x| x / norm).collect())
}

/// Divide `v` by the sum of its components so they read as proportions.
pub fn normalize_sum(v: &[f64], label: &str) -> Result<Vec<f64>> {
    let sum: f64 = v.iter().sum();
    if !sum.is_finite() || sum.abs() <= NORM_EPSILON {
        return Err(Error::DegenerateVector(label.to_string()));
    }
    Ok(v.iter().map(|x| x / sum).collect())
}

/// Coordinate-wise mean of the selected rows. All rows must share a width.
pub fn mean_rows(rows: &[Vec<f64>], indices: &[usize]) -> Result<Vec<f64>> {
    let first = indices
        .first()
        .and_then(|&i| rows.get(i))
        .ok_or_else(|| Error::malformed("mean", "no rows selected"))?;
    let dim = first.len();
    let mut acc = vec![0.0f64; dim];
    for &i in indices {
        let row = rows.get(i).ok_or_else(|| Error::malformed(format!("row {i}"), "index out of range"))?;
        check_dim(dim, row.len())?;
        for (a, x) in acc.iter_mut().zip(row) { *a += x; }
    }
    let n = indices.len() as f64;
    for a in &mut acc { *a /= n; }
    Ok(acc)
}

/// Median of a non-empty sample; the mean of the two middle values for
/// even counts.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() { return None; }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 { Some(values[mid]) } else { Some((values[mid - 1] + values[mid]) / 2.0) }
}

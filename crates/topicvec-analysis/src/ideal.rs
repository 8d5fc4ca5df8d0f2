//! How closely each topic vector matches an idealised interest shape.
//!
//! The ideal for the topic at position `i` puts `primary` on coordinate
//! `i mod D`, `secondary` on `(i + 1) mod D`, and spreads `residual_share`
//! evenly over the remaining coordinates. The fit is the cosine similarity
//! of the topic vector and its ideal.

use topicvec_core::config::IdealConfig;
use topicvec_core::types::TopicRecord;
use topicvec_core::vector::normalize;
use topicvec_core::{Error, Result};

use crate::similarity::score;

pub fn ideal_profile(index: usize, dimension: usize, cfg: &IdealConfig) -> Result<Vec<f64>> {
    if dimension < 2 {
        return Err(Error::InvalidConfig(format!("ideal profile needs at least 2 dimensions, got {}", dimension)));
    }
    let primary = index % dimension;
    let secondary = (index + 1) % dimension;
    let rest = cfg.residual_share / (dimension - 2).max(1) as f64;
    let mut v = vec![rest; dimension];
    v[primary] = cfg.primary;
    v[secondary] = cfg.secondary;
    normalize(&v, &format!("ideal profile {}", index))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitEntry {
    pub name: String,
    pub score: f64,
}

/// Entries sorted by descending score.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub entries: Vec<FitEntry>,
    pub average: f64,
}

impl FitReport {
    pub fn best(&self) -> Option<&FitEntry> { self.entries.first() }

    pub fn worst(&self) -> Option<&FitEntry> { self.entries.last() }
}

pub fn ideal_fit(topics: &[TopicRecord], cfg: &IdealConfig) -> Result<FitReport> {
    cfg.validate()?;
    let first = topics.first().ok_or_else(|| Error::malformed("topics", "no topics to fit"))?;
    let dimension = first.vector.len();
    let mut entries = topics
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let ideal = ideal_profile(i, dimension, cfg)?;
            Ok(FitEntry { name: t.name.clone(), score: score(&t.vector, &ideal)? })
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    let average = entries.iter().map(|e| e.score).sum::<f64>() / entries.len() as f64;
    Ok(FitReport { entries, average })
}

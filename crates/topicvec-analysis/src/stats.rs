//! Descriptive statistics over similarity samples.

use std::collections::BTreeMap;

use tracing::warn;

use topicvec_core::types::{Relationship, SimilarityPair};

/// Count, mean, population variance and range of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `None` for an empty sample.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut acc = Accumulator::default();
        for v in values { acc.push(v); }
        acc.finish()
    }

    pub fn std_dev(&self) -> f64 { self.variance.sqrt() }
}

/// Welford's running mean and variance; a constant sample yields exactly
/// zero variance.
#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.min = value;
            self.max = value;
            return;
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(self) -> Option<Summary> {
        (self.count > 0).then(|| Summary {
            count: self.count,
            mean: self.mean,
            variance: self.m2 / self.count as f64,
            min: self.min,
            max: self.max,
        })
    }
}

/// Per-group summaries of `(value, group)` samples. A group only appears
/// when it has at least one sample.
pub fn grouped_statistics<K, I>(samples: I) -> BTreeMap<K, Summary>
where
    K: Ord,
    I: IntoIterator<Item = (f64, K)>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for (value, key) in samples {
        groups.entry(key).or_default().push(value);
    }
    groups.into_iter().filter_map(|(k, acc)| acc.finish().map(|s| (k, s))).collect()
}

/// Similarity summaries by relationship class; classes without pairs are
/// left out with a warning.
pub fn relationship_statistics(pairs: &[SimilarityPair]) -> BTreeMap<Relationship, Summary> {
    let stats = grouped_statistics(pairs.iter().map(|p| (p.similarity, p.relationship)));
    for rel in Relationship::ALL {
        if !stats.contains_key(&rel) {
            warn!(group = %rel, "empty statistics group skipped");
        }
    }
    stats
}

/// Equal-width histogram over the sample range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `None` when there are no values or no bins.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 { return None; }
        let summary = Summary::from_values(values.iter().copied())?;
        let (min, max) = (summary.min, summary.max);
        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let bin = if width > 0.0 { (((v - min) / width) as usize).min(bins - 1) } else { 0 };
            counts[bin] += 1;
        }
        Some(Self { min, max, counts })
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower edge of `bin`.
    pub fn bin_start(&self, bin: usize) -> f64 {
        self.min + self.bin_width() * bin as f64
    }

    pub fn total(&self) -> usize { self.counts.iter().sum() }
}

//! Synthetic interest profiles.
//!
//! A profile has one dominant coordinate, one secondary coordinate and a low
//! residual everywhere else, at positions chosen by a random permutation.
//! The raw draw is scaled to sum to one and then to unit length, in that
//! order. The magnitude ordering only holds in expectation after both steps.

use rand::seq::SliceRandom;
use rand::Rng;

use topicvec_core::config::{SimulationConfig, ValueRange};
use topicvec_core::vector::{normalize, normalize_sum};
use topicvec_core::{Error, Result};

#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    dimension: usize,
    primary: ValueRange,
    secondary: ValueRange,
    residual: ValueRange,
}

impl ProfileGenerator {
    pub fn new(dimension: usize, primary: ValueRange, secondary: ValueRange, residual: ValueRange) -> Result<Self> {
        if dimension < 2 {
            return Err(Error::InvalidConfig(format!("profile dimension must be >= 2, got {}", dimension)));
        }
        primary.validate("primary range")?;
        secondary.validate("secondary range")?;
        residual.validate("residual range")?;
        Ok(Self { dimension, primary, secondary, residual })
    }

    pub fn from_config(cfg: &SimulationConfig) -> Result<Self> {
        Self::new(cfg.dimension, cfg.primary, cfg.secondary, cfg.residual)
    }

    pub fn dimension(&self) -> usize { self.dimension }

    /// Unnormalized draw: primary and secondary values at the first two
    /// permuted positions, residual values elsewhere.
    pub fn draw_raw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut order: Vec<usize> = (0..self.dimension).collect();
        order.shuffle(rng);
        let mut v = vec![0.0; self.dimension];
        v[order[0]] = uniform(rng, self.primary);
        v[order[1]] = uniform(rng, self.secondary);
        for &i in &order[2..] {
            v[i] = uniform(rng, self.residual);
        }
        v
    }

    /// Unit-length profile.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let raw = self.draw_raw(rng);
        let proportions = normalize_sum(&raw, "synthetic profile")?;
        normalize(&proportions, "synthetic profile")
    }
}

pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, range: ValueRange) -> f64 {
    if range.lo() == range.hi() { range.lo() } else { rng.gen_range(range.lo()..range.hi()) }
}

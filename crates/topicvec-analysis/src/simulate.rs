//! Monte Carlo estimate of how far apart two random users' interest scores
//! for the same random topic tend to be.

use rand::Rng;
use tracing::info;

use topicvec_core::{Error, Result};

use crate::profile::ProfileGenerator;
use crate::similarity::score;
use crate::stats::{Histogram, Summary};

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub draws: usize,
    /// Summary of `|s1 - s2|`.
    pub difference: Summary,
    pub first_user_mean: f64,
    pub second_user_mean: f64,
    pub histogram: Histogram,
}

/// Each draw generates two user profiles and one topic profile and records
/// the absolute difference of the two users' scores. `on_draw` is called
/// after every draw.
pub fn simulate_score_differences<R, F>(
    generator: &ProfileGenerator,
    draws: usize,
    bins: usize,
    rng: &mut R,
    mut on_draw: F,
) -> Result<SimulationReport>
where
    R: Rng + ?Sized,
    F: FnMut(usize),
{
    if draws == 0 || bins == 0 {
        return Err(Error::InvalidConfig("simulation needs at least one draw and one bin".to_string()));
    }
    let mut diffs = Vec::with_capacity(draws);
    let mut first = Vec::with_capacity(draws);
    let mut second = Vec::with_capacity(draws);
    for n in 0..draws {
        let u1 = generator.draw(rng)?;
        let u2 = generator.draw(rng)?;
        let topic = generator.draw(rng)?;
        let s1 = score(&u1, &topic)?;
        let s2 = score(&u2, &topic)?;
        first.push(s1);
        second.push(s2);
        diffs.push((s1 - s2).abs());
        on_draw(n + 1);
    }

    let summarize = |values: &[f64]| {
        Summary::from_values(values.iter().copied()).ok_or_else(|| Error::InvalidConfig("empty simulation sample".to_string()))
    };
    let difference = summarize(&diffs)?;
    let histogram = Histogram::new(&diffs, bins).ok_or_else(|| Error::InvalidConfig("empty simulation sample".to_string()))?;
    let report = SimulationReport {
        draws,
        difference,
        first_user_mean: summarize(&first)?.mean,
        second_user_mean: summarize(&second)?.mean,
        histogram,
    };
    info!(draws, mean = report.difference.mean, std = report.difference.std_dev(), "simulated score differences");
    Ok(report)
}

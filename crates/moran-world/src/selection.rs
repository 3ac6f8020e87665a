//! Random selection primitives.

use moran_core::{Error, Result};
use rand::Rng;

/// Fitness proportional (roulette wheel) selection.
///
/// Returns the index of the chosen weight. Zero weights are never chosen.
pub fn roulette<I, R>(weights: I, rng: &mut R) -> Result<usize>
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
    R: Rng + ?Sized,
{
    let weights = weights.into_iter();
    let total: f64 = weights.clone().sum();

    if !total.is_finite() || total <= 0.0 {
        return Err(Error::InvalidState(format!(
            "Cannot select from weights summing to {}",
            total
        )));
    }

    let pick = rng.gen_range(0.0..total);
    let mut current = 0.0;
    let mut last_positive = None;

    for (index, weight) in weights.enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_positive = Some(index);
        current += weight;
        if current > pick {
            return Ok(index);
        }
    }

    // Rounding can leave `current` a hair below `pick`
    last_positive.ok_or_else(|| Error::InvalidState("No positive weight to select".to_string()))
}

/// Draw the next label from a row of a transition matrix
pub fn sample_row<R: Rng + ?Sized>(row: &[f64], rng: &mut R) -> Result<usize> {
    roulette(row.iter().copied(), rng)
}

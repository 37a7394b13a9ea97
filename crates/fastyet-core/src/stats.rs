//! Statistics over repeated timing samples.
//!
//! Every function takes raw samples (milliseconds, as collected) and works in
//! `f64`. Unit conversion happens when chart points are built, not here.

use serde::Serialize;
use thiserror::Error;

/// Z-score for a two-sided ~95% interval under a normal approximation.
pub const Z_95: f64 = 1.96;

/// A statistic was requested over zero samples.
///
/// Collection always records at least one run per bucket, so this marks
/// broken input rather than a legitimately empty measurement.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot compute statistics over an empty sample")]
pub struct EmptyInputError;

/// Arithmetic mean.
pub fn average(samples: &[f64]) -> Result<f64, EmptyInputError> {
    if samples.is_empty() {
        return Err(EmptyInputError);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by N, not N - 1).
pub fn standard_deviation(samples: &[f64]) -> Result<f64, EmptyInputError> {
    let mean = average(samples)?;
    let variance = samples
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;
    Ok(variance.sqrt())
}

/// `(mean - Z·σ/√N, mean + Z·σ/√N)` with `Z = 1.96`.
pub fn confidence_interval(samples: &[f64]) -> Result<(f64, f64), EmptyInputError> {
    let mean = average(samples)?;
    let sigma = standard_deviation(samples)?;
    let step = Z_95 * sigma / (samples.len() as f64).sqrt();
    Ok((mean - step, mean + step))
}

/// Mean and confidence bounds of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    /// Lower 95% bound.
    pub low: f64,
    /// Sample mean.
    pub mid: f64,
    /// Upper 95% bound.
    pub high: f64,
}

impl Interval {
    /// Summarize a sample: `mid` is the mean, `low`/`high` the 95% bounds.
    pub fn from_samples(samples: &[f64]) -> Result<Self, EmptyInputError> {
        let mid = average(samples)?;
        let (low, high) = confidence_interval(samples)?;
        Ok(Interval { low, mid, high })
    }

    /// Apply a unit conversion to all three bounds.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Interval {
            low: f(self.low),
            mid: f(self.mid),
            high: f(self.high),
        }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

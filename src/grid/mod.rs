//! Grid sampling: evaluate a [`SurfaceModel`] at every point of an
//! `(S, t)` Cartesian product.
//!
//! The output follows the mesh layout used for surface plots: row `i` holds
//! time `t[i]`, column `j` holds underlying price `S[j]`, and
//! `values[i][j] = f(S[j], t[i])`.

use anyhow::{anyhow, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::models::traits::SurfaceModel;
use crate::models::SurfaceKind;

/// `points` evenly spaced samples over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// One axis of the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSpec {
    /// First sample
    pub min: f64,
    /// Last sample, included
    pub max: f64,
    /// Number of evenly spaced samples
    pub points: usize,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, points: usize) -> Self {
        Self { min, max, points }
    }

    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.points)
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.points == 0 {
            return Err(anyhow!("Axis '{}' needs at least one point", name));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(anyhow!(
                "Axis '{}' bounds must be finite, got [{}, {}]",
                name,
                self.min,
                self.max
            ));
        }
        if self.min > self.max {
            return Err(anyhow!(
                "Axis '{}' has min {} greater than max {}",
                name,
                self.min,
                self.max
            ));
        }
        Ok(())
    }
}

/// Underlying-price and time axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    pub underlying: AxisSpec,
    pub time: AxisSpec,
}

impl GridSpec {
    pub fn validate(&self) -> Result<()> {
        self.underlying.validate("underlying")?;
        self.time.validate("time")
    }
}

/// Sampled model values over an `(S, t)` mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub kind: SurfaceKind,
    /// Underlying prices (columns)
    pub underlying: Vec<f64>,
    /// Times (rows)
    pub time: Vec<f64>,
    /// `values[i][j] = f(underlying[j], time[i])`
    pub values: Vec<Vec<f64>>,
}

impl Surface {
    /// `(rows, columns)` = `(time.len(), underlying.len())`
    pub fn shape(&self) -> (usize, usize) {
        (self.time.len(), self.underlying.len())
    }

    /// Minimum and maximum over finite cells, or `None` when no cell is finite.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn non_finite_count(&self) -> usize {
        self.values
            .iter()
            .flatten()
            .filter(|v| !v.is_finite())
            .count()
    }
}

/// Evaluate `model` at every `(underlying[j], time[i])`.
///
/// Every time value is checked with [`SurfaceModel::validate_time`] before
/// any cell is computed. Non-finite results are kept in the surface and
/// reported, not treated as errors.
pub fn sample<M: SurfaceModel + ?Sized>(
    model: &M,
    underlying: &[f64],
    time: &[f64],
    parallel: bool,
) -> Result<Surface> {
    if underlying.is_empty() || time.is_empty() {
        return Err(anyhow!(
            "Cannot sample an empty grid ({} underlying x {} time points)",
            underlying.len(),
            time.len()
        ));
    }
    for &t in time {
        model.validate_time(t)?;
    }

    let row = |t: f64| -> Vec<f64> { underlying.iter().map(|&s| model.evaluate(s, t)).collect() };
    let values: Vec<Vec<f64>> = if parallel {
        time.par_iter().map(|&t| row(t)).collect()
    } else {
        time.iter().map(|&t| row(t)).collect()
    };

    let surface = Surface {
        kind: model.kind(),
        underlying: underlying.to_vec(),
        time: time.to_vec(),
        values,
    };

    let (rows, cols) = surface.shape();
    debug!(
        model = model.name(),
        strike = model.params().strike,
        rows,
        cols,
        parallel,
        "sampled surface"
    );

    let bad = surface.non_finite_count();
    if bad > 0 {
        warn!(
            model = model.name(),
            non_finite = bad,
            "surface contains non-finite values"
        );
    }

    Ok(surface)
}

/// Validate `grid` and sample `model` over its axes.
pub fn sample_grid<M: SurfaceModel + ?Sized>(
    model: &M,
    grid: &GridSpec,
    parallel: bool,
) -> Result<Surface> {
    grid.validate()?;
    sample(model, &grid.underlying.values(), &grid.time.values(), parallel)
}

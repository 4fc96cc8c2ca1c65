use serde::{Deserialize, Serialize};

use crate::errors::CsResult;

/// Per-dimension search intervals, stored as minimum and range.
///
/// The optimizer itself works in standardized coordinates where every
/// dimension is the unit interval [0, 1]; a physical coordinate is
/// `min + s * range`. Fitness functions always see physical coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBounds {
    min: Vec<f64>,
    range: Vec<f64>,
}

impl SearchBounds {
    /// Build bounds from per-dimension minima and ranges.
    ///
    /// Every range must be positive and finite; a degenerate interval is a
    /// configuration error, not a searchable dimension.
    pub fn new(min: Vec<f64>, range: Vec<f64>) -> CsResult<Self> {
        if min.is_empty() {
            return Err(crate::config_error!(
                "search bounds need at least one dimension"
            ));
        }
        if min.len() != range.len() {
            return Err(crate::config_error!(
                "search bounds have {} minima but {} ranges",
                min.len(),
                range.len()
            ));
        }
        for (d, (lo, width)) in min.iter().zip(&range).enumerate() {
            if !lo.is_finite() || !width.is_finite() || *width <= 0.0 {
                return Err(crate::config_error!(
                    "dimension {d} has invalid interval (min {lo}, range {width})"
                ));
            }
        }
        Ok(Self { min, range })
    }

    /// Build bounds from `(low, high)` intervals.
    pub fn from_intervals(intervals: &[(f64, f64)]) -> CsResult<Self> {
        let min = intervals.iter().map(|(lo, _)| *lo).collect();
        let range = intervals.iter().map(|(lo, hi)| hi - lo).collect();
        Self::new(min, range)
    }

    pub fn dim(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// Map standardized unit-cube coordinates to physical coordinates.
    pub fn to_physical(&self, standardized: &[f64]) -> Vec<f64> {
        standardized
            .iter()
            .zip(&self.min)
            .zip(&self.range)
            .map(|((s, lo), width)| lo + s * width)
            .collect()
    }

    /// Map physical coordinates back onto the unit cube.
    pub fn to_standard(&self, physical: &[f64]) -> Vec<f64> {
        physical
            .iter()
            .zip(&self.min)
            .zip(&self.range)
            .map(|((x, lo), width)| (x - lo) / width)
            .collect()
    }

    /// True if every component of `physical` lies within its interval.
    pub fn contains_physical(&self, physical: &[f64]) -> bool {
        physical.len() == self.dim()
            && physical
                .iter()
                .zip(&self.min)
                .zip(&self.range)
                .all(|((x, lo), width)| *x >= *lo && *x <= lo + width)
    }
}

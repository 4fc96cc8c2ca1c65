//! The four-dimensional coalescence parameter space.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use cs_types::{CsResult, GeneralSettings, SearchBounds};

/// Physical coordinates of one candidate coalescence.
///
/// Angles are radians; chirp times are seconds from the low-frequency
/// cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoalescenceParams {
    pub right_ascension: f64,
    pub declination: f64,
    pub chirp_time_0: f64,
    pub chirp_time_1_5: f64,
}

/// Search box over sky position and the two chirp times.
///
/// Right ascension spans the full circle and declination the full
/// polar range; the chirp-time ceilings come from the lowest mass the
/// search is expected to reach.
#[derive(Debug, Clone)]
pub struct CoalescenceSpace {
    bounds: SearchBounds,
}

impl CoalescenceSpace {
    pub const DIM: usize = 4;

    pub fn new(max_chirp_time_0: f64, max_chirp_time_1_5: f64) -> CsResult<Self> {
        let intervals: [(f64, f64); Self::DIM] = [
            (-PI, PI),
            (-FRAC_PI_2, FRAC_PI_2),
            (0.0, max_chirp_time_0),
            (0.0, max_chirp_time_1_5),
        ];
        let bounds = SearchBounds::from_intervals(&intervals)?;
        Ok(Self { bounds })
    }

    pub fn from_settings(settings: &GeneralSettings) -> CsResult<Self> {
        Self::new(settings.max_chirp_time_0, settings.max_chirp_time_1_5)
    }

    pub fn bounds(&self) -> &SearchBounds {
        &self.bounds
    }

    /// Map a standardized point out of the unit cube into labeled
    /// physical parameters.
    pub fn params_from_standard(&self, standard: &[f64]) -> CoalescenceParams {
        Self::params_from_physical(&self.bounds.to_physical(standard))
    }

    pub fn params_from_physical(physical: &[f64]) -> CoalescenceParams {
        CoalescenceParams {
            right_ascension: physical[0],
            declination: physical[1],
            chirp_time_0: physical[2],
            chirp_time_1_5: physical[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_corners_map_to_the_physical_box() {
        let space = CoalescenceSpace::new(43.5, 1.05).unwrap();
        assert_eq!(space.bounds().dim(), CoalescenceSpace::DIM);

        let low = space.params_from_standard(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(low.right_ascension, -PI);
        assert_eq!(low.declination, -FRAC_PI_2);
        assert_eq!(low.chirp_time_0, 0.0);
        assert_eq!(low.chirp_time_1_5, 0.0);

        let high = space.params_from_standard(&[1.0, 1.0, 1.0, 1.0]);
        assert!((high.right_ascension - PI).abs() < 1e-12);
        assert!((high.declination - FRAC_PI_2).abs() < 1e-12);
        assert!((high.chirp_time_0 - 43.5).abs() < 1e-12);
        assert!((high.chirp_time_1_5 - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint_is_the_center_of_the_box() {
        let space = CoalescenceSpace::new(40.0, 1.0).unwrap();
        let mid = space.params_from_standard(&[0.5, 0.5, 0.5, 0.5]);
        assert!(mid.right_ascension.abs() < 1e-12);
        assert!(mid.declination.abs() < 1e-12);
        assert!((mid.chirp_time_0 - 20.0).abs() < 1e-12);
        assert!((mid.chirp_time_1_5 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_nonpositive_chirp_ceilings_rejected() {
        assert!(CoalescenceSpace::new(0.0, 1.05).is_err());
        assert!(CoalescenceSpace::new(43.5, -1.0).is_err());
    }
}

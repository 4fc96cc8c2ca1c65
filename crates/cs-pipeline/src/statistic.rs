//! Coherent network detection statistic over candidate parameters.

use serde::{Deserialize, Serialize};

use cs_swarm::FitnessEvaluator;
use cs_types::GeneralSettings;

use crate::space::{CoalescenceParams, CoalescenceSpace};

/// Detection statistic of the detector network at one point of the
/// parameter space. Larger values mean a stronger candidate.
///
/// Implementations are evaluated concurrently from worker threads.
pub trait NetworkStatistic: Send + Sync {
    fn statistic(&self, params: &CoalescenceParams) -> f64;
}

/// Closed-form statistic peaked at an injected test source.
///
/// Stands in for the full matched-filter network statistic when no
/// strain data is loaded: a sky response falling off with great-circle
/// separation from the source, a weaker antipodal sidelobe, and
/// Gaussian factors in both chirp times. The global maximum sits at
/// the injected parameters with height `peak_statistic`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestSourceStatistic {
    pub right_ascension: f64,
    pub declination: f64,
    pub chirp_time_0: f64,
    pub chirp_time_1_5: f64,
    pub peak_statistic: f64,
    pub sky_sharpness: f64,
    pub chirp_time_0_scale: f64,
    pub chirp_time_1_5_scale: f64,
}

impl Default for TestSourceStatistic {
    fn default() -> Self {
        Self {
            right_ascension: -2.14,
            declination: 0.72,
            chirp_time_0: 24.97,
            chirp_time_1_5: 0.866,
            peak_statistic: 9.0,
            sky_sharpness: 8.0,
            chirp_time_0_scale: 5.0,
            chirp_time_1_5_scale: 0.2,
        }
    }
}

impl TestSourceStatistic {
    pub fn from_settings(settings: &GeneralSettings) -> Self {
        Self {
            right_ascension: settings.source_ra,
            declination: settings.source_dec,
            chirp_time_0: settings.source_chirp_time_0,
            chirp_time_1_5: settings.source_chirp_time_1_5,
            peak_statistic: settings.source_snr,
            ..Self::default()
        }
    }
}

impl NetworkStatistic for TestSourceStatistic {
    fn statistic(&self, params: &CoalescenceParams) -> f64 {
        let cos_sep = self.declination.sin() * params.declination.sin()
            + self.declination.cos()
                * params.declination.cos()
                * (params.right_ascension - self.right_ascension).cos();
        let primary = ((cos_sep - 1.0) * self.sky_sharpness).exp();
        let sidelobe = 0.3 * ((-cos_sep - 1.0) * self.sky_sharpness).exp();
        let t0 = (-((params.chirp_time_0 - self.chirp_time_0) / self.chirp_time_0_scale).powi(2))
            .exp();
        let t1_5 = (-((params.chirp_time_1_5 - self.chirp_time_1_5)
            / self.chirp_time_1_5_scale)
            .powi(2))
        .exp();
        self.peak_statistic * (primary + sidelobe) * t0 * t1_5
    }
}

/// Adapts a statistic to the swarm's minimizing evaluator by negating
/// it, after mapping physical coordinates into labeled parameters.
pub struct StatisticObjective<'a> {
    statistic: &'a dyn NetworkStatistic,
}

impl<'a> StatisticObjective<'a> {
    pub fn new(statistic: &'a dyn NetworkStatistic) -> Self {
        Self { statistic }
    }
}

impl FitnessEvaluator for StatisticObjective<'_> {
    fn evaluate(&self, position: &[f64]) -> f64 {
        let statistic = self
            .statistic
            .statistic(&CoalescenceSpace::params_from_physical(position));
        // Negation flips the sign bit, and `total_cmp` ranks negative NaN
        // below every real. A degenerate statistic must stay a plain NaN so
        // it cannot displace a finite best.
        if statistic.is_nan() {
            f64::NAN
        } else {
            -statistic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_swarm::{NullObserver, SwarmConfig, SwarmEngine};
    use std::cmp::Ordering;
    use std::f64::consts::PI;

    fn source_params(statistic: &TestSourceStatistic) -> CoalescenceParams {
        CoalescenceParams {
            right_ascension: statistic.right_ascension,
            declination: statistic.declination,
            chirp_time_0: statistic.chirp_time_0,
            chirp_time_1_5: statistic.chirp_time_1_5,
        }
    }

    #[test]
    fn test_peak_sits_at_the_injected_source() {
        let statistic = TestSourceStatistic::default();
        let at_source = statistic.statistic(&source_params(&statistic));
        assert!((at_source - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_antipodal_sidelobe_is_weaker_than_the_peak() {
        let statistic = TestSourceStatistic::default();
        let mut antipode = source_params(&statistic);
        antipode.right_ascension += PI;
        antipode.declination = -antipode.declination;

        let value = statistic.statistic(&antipode);
        assert!((value - 2.7).abs() < 1e-4);
        assert!(value < statistic.statistic(&source_params(&statistic)));
    }

    #[test]
    fn test_statistic_decays_with_chirp_time_mismatch() {
        let statistic = TestSourceStatistic::default();
        let mut off = source_params(&statistic);
        off.chirp_time_0 += statistic.chirp_time_0_scale;

        let at_source = statistic.statistic(&source_params(&statistic));
        let value = statistic.statistic(&off);
        assert!(value < at_source * 0.5);
        assert!(value > 0.0);
    }

    #[test]
    fn test_objective_is_the_negated_statistic() {
        let statistic = TestSourceStatistic::default();
        let objective = StatisticObjective::new(&statistic);
        let physical = [
            statistic.right_ascension,
            statistic.declination,
            statistic.chirp_time_0,
            statistic.chirp_time_1_5,
        ];
        let fitness = objective.evaluate(&physical);
        assert!((fitness + 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_statistic_negates_to_plain_nan() {
        struct AlwaysNan;
        impl NetworkStatistic for AlwaysNan {
            fn statistic(&self, _params: &CoalescenceParams) -> f64 {
                f64::NAN
            }
        }

        let objective = StatisticObjective::new(&AlwaysNan);
        let fitness = objective.evaluate(&[0.0, 0.0, 20.0, 0.8]);
        assert!(fitness.is_nan());
        // A sign-negative NaN would rank below every real under
        // `total_cmp` and swallow the swarm best.
        assert!(fitness.is_sign_positive());
        assert_eq!(fitness.total_cmp(&f64::NEG_INFINITY), Ordering::Greater);
    }

    #[test]
    fn test_nan_statistic_region_never_displaces_a_finite_best() {
        // NaN east of the meridian, at least 1.0 everywhere west of it.
        struct HalfSkyStatistic;
        impl NetworkStatistic for HalfSkyStatistic {
            fn statistic(&self, params: &CoalescenceParams) -> f64 {
                if params.right_ascension > 0.0 {
                    f64::NAN
                } else {
                    1.0 + params.declination.cos()
                }
            }
        }

        let space = CoalescenceSpace::new(43.5, 1.05).unwrap();
        let config = SwarmConfig::default()
            .with_popsize(16)
            .with_max_steps(25)
            .with_refinement(0, 0.01);
        let mut engine = SwarmEngine::new(config, space.bounds().clone(), 7).unwrap();
        let objective = StatisticObjective::new(&HalfSkyStatistic);
        let outcome = engine.run(&objective, &mut NullObserver, None).unwrap();

        assert!(outcome.best_fitness.is_finite());
        assert!(outcome.best_fitness <= -1.0);
    }
}

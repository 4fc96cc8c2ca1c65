//! Swarm configuration and the inertia decay law.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cs_types::{config_error, CsResult, SettingsFile};

use crate::topology::Topology;

/// Full parameter set for one swarm run.
///
/// The stopping criterion is the iteration count alone. Inertia decays
/// linearly over iterations as `w(k) = max(a - (b/c) * k, d)` with `k`
/// starting at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Number of particles.
    pub popsize: usize,
    /// Number of iterations after initialization.
    pub max_steps: usize,
    /// Acceleration constant toward the personal best.
    pub c1: f64,
    /// Acceleration constant toward the neighborhood best.
    pub c2: f64,
    /// Velocity cap per dimension, as a fraction of that dimension's range.
    pub max_velocity: f64,
    pub inertia_a: f64,
    pub inertia_b: f64,
    pub inertia_c: f64,
    pub inertia_d: f64,
    /// Local-refinement iteration budget; 0 switches refinement off.
    pub refine_iters: usize,
    /// Initial simplex step of the refiner, in standardized coordinates.
    pub refine_step: f64,
    pub topology: Topology,
    /// Iterations between progress reports; 0 switches reporting off.
    pub report_interval: usize,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            popsize: 40,
            max_steps: 250,
            c1: 2.0,
            c2: 2.0,
            max_velocity: 0.2,
            inertia_a: 0.9,
            inertia_b: 0.4,
            inertia_c: 250.0,
            inertia_d: 0.2,
            refine_iters: 10,
            refine_step: 0.01,
            topology: Topology::RingLocal { span: 1 },
            report_interval: 0,
        }
    }
}

impl SwarmConfig {
    pub fn with_popsize(mut self, popsize: usize) -> Self {
        self.popsize = popsize;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self.inertia_c = max_steps as f64;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_refinement(mut self, iters: usize, step: f64) -> Self {
        self.refine_iters = iters;
        self.refine_step = step;
        self
    }

    pub fn with_report_interval(mut self, interval: usize) -> Self {
        self.report_interval = interval;
        self
    }

    /// Inertia weight for 0-based iteration `k`.
    pub fn inertia_weight(&self, k: usize) -> f64 {
        (self.inertia_a - (self.inertia_b / self.inertia_c) * k as f64).max(self.inertia_d)
    }

    pub fn validate(&self) -> CsResult<()> {
        if self.popsize == 0 {
            return Err(config_error!("popsize must be at least 1"));
        }
        if !(self.max_velocity > 0.0 && self.max_velocity.is_finite()) {
            return Err(config_error!(
                "max_velocity must be a positive fraction, got {}",
                self.max_velocity
            ));
        }
        if !(self.c1 >= 0.0 && self.c1.is_finite() && self.c2 >= 0.0 && self.c2.is_finite()) {
            return Err(config_error!(
                "acceleration constants must be finite and non-negative (c1 {}, c2 {})",
                self.c1,
                self.c2
            ));
        }
        if !(self.inertia_c > 0.0)
            || ![self.inertia_a, self.inertia_b, self.inertia_d]
                .iter()
                .all(|v| v.is_finite())
        {
            return Err(config_error!(
                "inertia decay law needs finite coefficients and a positive divisor"
            ));
        }
        if self.refine_iters > 0 && !(self.refine_step > 0.0 && self.refine_step < 1.0) {
            return Err(config_error!(
                "refine_step must lie in (0, 1), got {}",
                self.refine_step
            ));
        }
        if let Topology::RingLocal { span } = self.topology {
            if span == 0 {
                return Err(config_error!("ring_span must be at least 1"));
            }
        }
        Ok(())
    }

    /// Read the optimizer settings file. Absent keys take their defaults;
    /// `inertia_c` defaults to the configured `max_steps`.
    pub fn from_file(path: impl AsRef<Path>) -> CsResult<Self> {
        Self::from_settings(&SettingsFile::open(path)?)
    }

    pub fn from_settings(settings: &SettingsFile) -> CsResult<Self> {
        let defaults = Self::default();

        let max_steps = settings.get_usize("max_steps")?.unwrap_or(defaults.max_steps);
        let span = settings.get_usize("ring_span")?.unwrap_or(1);
        let topology = match settings.get("topology").unwrap_or("lbest") {
            "gbest" => Topology::GlobalBest,
            "lbest" => Topology::RingLocal { span },
            "standard" => Topology::Standard,
            other => {
                return Err(config_error!(
                    "unknown topology '{other}' (expected gbest, lbest, or standard)"
                ))
            }
        };

        let config = Self {
            popsize: settings.get_usize("popsize")?.unwrap_or(defaults.popsize),
            max_steps,
            c1: settings.get_f64("c1")?.unwrap_or(defaults.c1),
            c2: settings.get_f64("c2")?.unwrap_or(defaults.c2),
            max_velocity: settings
                .get_f64("max_velocity")?
                .unwrap_or(defaults.max_velocity),
            inertia_a: settings.get_f64("inertia_a")?.unwrap_or(defaults.inertia_a),
            inertia_b: settings.get_f64("inertia_b")?.unwrap_or(defaults.inertia_b),
            inertia_c: settings.get_f64("inertia_c")?.unwrap_or(max_steps as f64),
            inertia_d: settings.get_f64("inertia_d")?.unwrap_or(defaults.inertia_d),
            refine_iters: settings
                .get_usize("refine_iters")?
                .unwrap_or(defaults.refine_iters),
            refine_step: settings
                .get_f64("refine_step")?
                .unwrap_or(defaults.refine_step),
            topology,
            report_interval: settings
                .get_usize("report_interval")?
                .unwrap_or(defaults.report_interval),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SwarmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.popsize, 40);
        assert_eq!(config.max_steps, 250);
        assert_eq!(config.inertia_c, 250.0);
    }

    #[test]
    fn test_inertia_starts_at_a_and_never_falls_below_d() {
        let config = SwarmConfig::default();
        assert_eq!(config.inertia_weight(0), 0.9);

        let mut previous = f64::INFINITY;
        for k in 0..2000 {
            let w = config.inertia_weight(k);
            assert!(w <= previous, "inertia increased at k = {k}");
            assert!(w >= config.inertia_d);
            previous = w;
        }
    }

    #[test]
    fn test_inertia_floor_holds_once_reached() {
        // Floor is reached at k = c * (a - d) / b = 35.
        let config = SwarmConfig {
            inertia_c: 20.0,
            ..SwarmConfig::default()
        };
        assert_eq!(config.inertia_weight(35), 0.2);
        assert_eq!(config.inertia_weight(36), 0.2);
        assert_eq!(config.inertia_weight(500), 0.2);
    }

    #[test]
    fn test_zero_popsize_rejected() {
        let config = SwarmConfig::default().with_popsize(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_ring_span_rejected() {
        let config = SwarmConfig::default().with_topology(Topology::RingLocal { span: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_settings_applies_defaults() {
        let settings = SettingsFile::parse("popsize = 24\n", "pso.cfg").unwrap();
        let config = SwarmConfig::from_settings(&settings).unwrap();
        assert_eq!(config.popsize, 24);
        assert_eq!(config.max_steps, 250);
        assert_eq!(config.c1, 2.0);
        assert_eq!(config.topology, Topology::RingLocal { span: 1 });
    }

    #[test]
    fn test_inertia_divisor_follows_max_steps() {
        let settings = SettingsFile::parse("max_steps = 100\n", "pso.cfg").unwrap();
        let config = SwarmConfig::from_settings(&settings).unwrap();
        assert_eq!(config.inertia_c, 100.0);
    }

    #[test]
    fn test_topology_and_span_parsed_together() {
        let settings =
            SettingsFile::parse("topology = lbest\nring_span = 2\n", "pso.cfg").unwrap();
        let config = SwarmConfig::from_settings(&settings).unwrap();
        assert_eq!(config.topology, Topology::RingLocal { span: 2 });

        let settings = SettingsFile::parse("topology = gbest\n", "pso.cfg").unwrap();
        let config = SwarmConfig::from_settings(&settings).unwrap();
        assert_eq!(config.topology, Topology::GlobalBest);
    }

    #[test]
    fn test_unknown_topology_rejected() {
        let settings = SettingsFile::parse("topology = mesh\n", "pso.cfg").unwrap();
        assert!(SwarmConfig::from_settings(&settings).is_err());
    }
}

//! Objective function abstraction and reference benchmarks.

/// A fitness function over physical coordinates. Lower is better.
///
/// Implementations must be callable from multiple worker threads at
/// once, hence `Send + Sync`.
pub trait FitnessEvaluator: Send + Sync {
    fn evaluate(&self, position: &[f64]) -> f64;
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, position: &[f64]) -> f64 {
        self(position)
    }
}

/// Sum of squares, minimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl FitnessEvaluator for Sphere {
    fn evaluate(&self, position: &[f64]) -> f64 {
        position.iter().map(|x| x * x).sum()
    }
}

/// Highly multimodal benchmark, minimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rastrigin;

impl FitnessEvaluator for Rastrigin {
    fn evaluate(&self, position: &[f64]) -> f64 {
        use std::f64::consts::TAU;
        10.0 * position.len() as f64
            + position
                .iter()
                .map(|x| x * x - 10.0 * (TAU * x).cos())
                .sum::<f64>()
    }
}

/// Narrow curved valley, minimum 0 at `(1, ..., 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rosenbrock;

impl FitnessEvaluator for Rosenbrock {
    fn evaluate(&self, position: &[f64]) -> f64 {
        position
            .windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum()
    }
}

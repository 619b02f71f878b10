// Kepler Solver - eccentric anomaly from mean anomaly
// Newton-Raphson on M = E - e*sin(E)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::math::normalize_angle;

pub const DEFAULT_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Above this eccentricity the iteration starts from π instead of M
const HIGH_ECCENTRICITY_START: f64 = 0.8;

/// Outcome of a Kepler solve.
///
/// A solve that runs out of iterations still carries its last estimate; the
/// caller decides whether to log it. Positions derived from an unconverged
/// estimate are approximate, never invalid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeplerSolution {
    /// Eccentric anomaly (radians)
    pub eccentric_anomaly: f64,
    /// Mean anomaly actually solved for, reduced to [0, 2π)
    pub mean_anomaly: f64,
    pub iterations: u32,
    pub converged: bool,
}

impl KeplerSolution {
    /// |E - e*sin(E) - M|
    pub fn residual(&self, eccentricity: f64) -> f64 {
        (self.eccentric_anomaly - eccentricity * self.eccentric_anomaly.sin() - self.mean_anomaly)
            .abs()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeplerSolver {
    /// Stop once |ΔE| drops below this (radians)
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KeplerSolver {
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Solve Kepler's equation for `0 <= eccentricity < 1`.
    ///
    /// `mean_anomaly` may be any finite angle; it is reduced modulo 2π first.
    /// Inputs are not validated here: `OrbitCalculator` rejects bad elements
    /// before solving, and out-of-domain calls yield a NaN estimate with
    /// `converged: false`. Debug builds assert the domain.
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
        debug_assert!(
            (0.0..1.0).contains(&eccentricity),
            "eccentricity {} outside [0, 1)",
            eccentricity
        );
        debug_assert!(mean_anomaly.is_finite(), "mean anomaly {} not finite", mean_anomaly);
        let m = normalize_angle(mean_anomaly);
        let e = eccentricity;

        let mut e_anom = if e < HIGH_ECCENTRICITY_START { m } else { PI };
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let f = e_anom - e * e_anom.sin() - m;
            let f_prime = 1.0 - e * e_anom.cos();
            let delta = f / f_prime;
            e_anom -= delta;
            iterations += 1;

            if delta.abs() < self.tolerance {
                converged = true;
                break;
            }
        }

        KeplerSolution {
            eccentric_anomaly: e_anom,
            mean_anomaly: m,
            iterations,
            converged,
        }
    }
}

/// Solve with default tolerance and iteration cap, returning only E
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    KeplerSolver::default()
        .solve(mean_anomaly, eccentricity)
        .eccentric_anomaly
}

// Dark Matter Halo - NFW-like radial sampling with oscillating density nodes
// The only mutable state in the core: `tick` rewrites node densities

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::MAX_DARK_MATTER_NODES;
use crate::error::{require_finite, require_non_negative, require_positive, EngineError, EngineResult};
use crate::math::{point_on_sphere, Vector3};

/// NFW scale radius as a fraction of galaxy radius
const SCALE_RADIUS_FRACTION: f64 = 0.25;

/// Upper bound on the inverse-transform uniform; keeps u/(1-u) finite
const MAX_UNIFORM: f64 = 0.99;

/// Oscillation frequency range (Hz)
const MIN_OSCILLATION_HZ: f64 = 0.05;
const MAX_OSCILLATION_HZ: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarkMatterNode {
    pub position: Vector3,
    /// Density before oscillation, falls off with radius
    pub base_density: f64,
    /// Current density, rewritten by `DarkMatterHalo::tick`.
    /// The oscillation is additive, so outer nodes whose base density is
    /// below the halo amplitude swing negative for part of each period.
    /// Renderers treat anything below zero as empty space.
    pub density: f64,
    /// Hz
    pub oscillation_frequency: f64,
    pub influence_radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarkMatterHalo {
    pub nodes: Vec<DarkMatterNode>,
    pub amplitude: f64,
}

impl DarkMatterHalo {
    pub fn empty(amplitude: f64) -> Self {
        Self {
            nodes: Vec::new(),
            amplitude,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        node_count: usize,
        galaxy_radius: f64,
        density: f64,
        amplitude: f64,
    ) -> EngineResult<Self> {
        require_positive("galaxy_radius", galaxy_radius)?;
        require_non_negative("dark_matter_density", density)?;
        require_non_negative("oscillation_amplitude", amplitude)?;
        if node_count > MAX_DARK_MATTER_NODES {
            return Err(EngineError::invalid(
                "dark_matter_nodes",
                format!("must be at most {}, got {}", MAX_DARK_MATTER_NODES, node_count),
            ));
        }

        let scale_radius = galaxy_radius * SCALE_RADIUS_FRACTION;
        let nodes = (0..node_count)
            .map(|_| {
                let u = rng.gen::<f64>() * MAX_UNIFORM;
                let r = scale_radius * (u / (1.0 - u)).cbrt() * 2.0;
                let base_density = density / (1.0 + (r / galaxy_radius).powi(2));

                DarkMatterNode {
                    position: point_on_sphere(rng, r),
                    base_density,
                    density: base_density,
                    oscillation_frequency: rng.gen_range(MIN_OSCILLATION_HZ..MAX_OSCILLATION_HZ),
                    influence_radius: 0.05 * galaxy_radius * (1.0 + r / galaxy_radius),
                }
            })
            .collect();

        Ok(Self { nodes, amplitude })
    }

    /// Set every node's density for absolute time `time` (seconds).
    /// Depends only on `time`, so repeated calls with the same value agree.
    pub fn tick(&mut self, time: f64) -> EngineResult<()> {
        require_finite("time", time)?;
        for node in &mut self.nodes {
            node.density =
                node.base_density + self.amplitude * (TAU * node.oscillation_frequency * time).sin();
        }
        Ok(())
    }

    /// Largest radius the sampler can produce for this galaxy radius
    pub fn max_radius(galaxy_radius: f64) -> f64 {
        galaxy_radius * SCALE_RADIUS_FRACTION * (MAX_UNIFORM / (1.0 - MAX_UNIFORM)).cbrt() * 2.0
    }
}

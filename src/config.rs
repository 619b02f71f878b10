// Configuration records for the orbital and galaxy pipelines
// All defaults live here; partial JSON documents fill the rest from Default

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{
    require_finite, require_in_range, require_positive, EngineError,
    EngineResult,
};
use crate::kepler::{KeplerSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

// =============================================================================
// ORBIT CONFIGURATION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Animation speed multiplier applied to elapsed time
    pub time_multiplier: f64,
    /// Scene units per astronomical unit
    pub au_to_scene: f64,
    pub kepler_tolerance: f64,
    pub kepler_max_iterations: u32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            time_multiplier: 1.0,
            au_to_scene: 10.0,
            kepler_tolerance: DEFAULT_TOLERANCE,
            kepler_max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OrbitConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        require_finite("time_multiplier", self.time_multiplier)?;
        require_positive("au_to_scene", self.au_to_scene)?;
        require_positive("kepler_tolerance", self.kepler_tolerance)?;
        if self.kepler_max_iterations == 0 {
            return Err(EngineError::invalid("kepler_max_iterations", "must be at least 1"));
        }
        Ok(())
    }

    pub fn solver(&self) -> KeplerSolver {
        KeplerSolver::new(self.kepler_tolerance, self.kepler_max_iterations)
    }
}

// =============================================================================
// GALAXY CONFIGURATION
// =============================================================================

// Upper limits keep every derived position and frequency finite
pub const MAX_STAR_COUNT: usize = 5_000_000;
pub const MAX_DARK_MATTER_NODES: usize = 100_000;
const MAX_GALAXY_RADIUS: f64 = 1.0e9;
const MAX_SPIRAL_TIGHTNESS: f64 = 100.0;
const MIN_CENTRAL_MASS: f64 = 1.0;
const MAX_CENTRAL_MASS: f64 = 1.0e12;
const MAX_DARK_MATTER_DENSITY: f64 = 1.0e6;
const MAX_FREQUENCY_HZ: f64 = 1.0e6;

/// How stars are apportioned across gravitational zones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSelection {
    /// Per-zone counts fixed by largest-remainder quotas, order randomised
    #[default]
    Quota,
    /// Each star draws its zone independently from the zone weights
    Sampled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Outer radius of the stellar disk (scene units)
    pub galaxy_radius: f64,
    pub spiral_arms: u32,
    /// Winding of the arms; 0 gives straight spokes
    pub spiral_tightness: f64,
    /// Angular scatter of disk stars around their arm (radians at full jitter)
    pub arm_spread: f64,
    /// Disk half-thickness as a fraction of galaxy radius
    pub disk_thickness: f64,
    pub star_count: usize,
    pub enable_gravitational_waves: bool,
    pub enable_orbital_resonance: bool,
    pub enable_dark_matter: bool,
    /// Central black hole mass (solar masses)
    pub central_mass: f64,
    pub resonance_harmonics: Vec<u32>,
    pub dark_matter_density: f64,
    pub dark_matter_nodes: usize,
    pub oscillation_amplitude: f64,
    /// Audible range (Hz) that gravitational-wave frequencies are mapped into
    pub frequency_range: (f64, f64),
    pub zone_selection: ZoneSelection,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            galaxy_radius: 100.0,
            spiral_arms: 4,
            spiral_tightness: 0.5,
            arm_spread: 0.35,
            disk_thickness: 0.04,
            star_count: 20_000,
            enable_gravitational_waves: true,
            enable_orbital_resonance: true,
            enable_dark_matter: true,
            central_mass: 4.0e6,
            resonance_harmonics: vec![1, 2, 3, 5, 8, 13],
            dark_matter_density: 0.3,
            dark_matter_nodes: 200,
            oscillation_amplitude: 0.1,
            frequency_range: (0.1, 1000.0),
            zone_selection: ZoneSelection::Quota,
        }
    }
}

impl GalaxyConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        require_positive("galaxy_radius", self.galaxy_radius)?;
        require_in_range("galaxy_radius", self.galaxy_radius, 0.0, MAX_GALAXY_RADIUS)?;
        if self.spiral_arms == 0 {
            return Err(EngineError::invalid("spiral_arms", "must be at least 1"));
        }
        require_in_range(
            "spiral_tightness",
            self.spiral_tightness,
            -MAX_SPIRAL_TIGHTNESS,
            MAX_SPIRAL_TIGHTNESS,
        )?;
        require_in_range("arm_spread", self.arm_spread, 0.0, TAU)?;
        require_in_range("disk_thickness", self.disk_thickness, 0.0, 1.0)?;
        require_in_range("central_mass", self.central_mass, MIN_CENTRAL_MASS, MAX_CENTRAL_MASS)?;
        if self.star_count > MAX_STAR_COUNT {
            return Err(EngineError::invalid(
                "star_count",
                format!("must be at most {}, got {}", MAX_STAR_COUNT, self.star_count),
            ));
        }

        if self.enable_orbital_resonance {
            if self.resonance_harmonics.is_empty() {
                return Err(EngineError::invalid(
                    "resonance_harmonics",
                    "must not be empty while orbital resonance is enabled",
                ));
            }
            if self.resonance_harmonics.contains(&0) {
                return Err(EngineError::invalid("resonance_harmonics", "harmonics must be >= 1"));
            }
        }

        require_in_range("dark_matter_density", self.dark_matter_density, 0.0, MAX_DARK_MATTER_DENSITY)?;
        require_in_range(
            "oscillation_amplitude",
            self.oscillation_amplitude,
            0.0,
            MAX_DARK_MATTER_DENSITY,
        )?;
        if self.dark_matter_nodes > MAX_DARK_MATTER_NODES {
            return Err(EngineError::invalid(
                "dark_matter_nodes",
                format!("must be at most {}, got {}", MAX_DARK_MATTER_NODES, self.dark_matter_nodes),
            ));
        }

        let (low, high) = self.frequency_range;
        require_positive("frequency_range", low)?;
        require_in_range("frequency_range", high, 0.0, MAX_FREQUENCY_HZ)?;
        if low >= high {
            return Err(EngineError::invalid(
                "frequency_range",
                format!("lower bound {} must be below upper bound {}", low, high),
            ));
        }
        Ok(())
    }
}

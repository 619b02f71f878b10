// Orbital State Calculator - Keplerian elements + elapsed time -> position
// Analytic two-body motion per body; no mutual perturbations

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::OrbitConfig;
use crate::error::{require_finite, require_non_negative, require_positive, EngineError, EngineResult};
use crate::kepler::KeplerSolver;
use crate::math::{normalize_angle, Color, Vector3, DEG_TO_RAD};

// =============================================================================
// PHYSICAL CONSTANTS
// =============================================================================

/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 1.495978707e8;

/// Days per Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Largest eccentricity accepted; beyond this the true-anomaly conversion
/// loses precision near perihelion
pub const MAX_ECCENTRICITY: f64 = 0.99;

// =============================================================================
// KEPLERIAN ORBITAL ELEMENTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicalAttributes {
    /// Mean radius (km)
    pub radius: f64,
    /// Mass (Earth masses)
    pub mass: f64,
    /// Sidereal rotation period (hours); negative for retrograde rotation
    pub rotation_period: f64,
    /// Axial tilt (degrees)
    pub axial_tilt: f64,
    /// Display color, 0xRRGGBB
    pub color: u32,
    pub has_rings: bool,
    pub moon_count: u32,
}

impl PhysicalAttributes {
    pub fn display_color(&self) -> Color {
        Color::from_hex(self.color)
    }
}

/// Heliocentric elements of one body. Built once from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrbitalElements {
    pub name: String,
    /// Semi-major axis (AU)
    pub semi_major_axis: f64,
    /// Eccentricity (0-1 for elliptical)
    pub eccentricity: f64,
    /// Orbital period (days)
    pub orbital_period: f64,
    /// Inclination (degrees)
    pub inclination: f64,
    /// Longitude of ascending node (degrees)
    pub longitude_ascending_node: f64,
    /// Argument of perihelion (degrees)
    pub argument_perihelion: f64,
    pub physical: PhysicalAttributes,
}

impl OrbitalElements {
    pub fn validate(&self) -> EngineResult<()> {
        require_positive("semi_major_axis", self.semi_major_axis)?;
        validate_eccentricity(self.eccentricity)?;
        require_positive("orbital_period", self.orbital_period)?;
        require_finite("inclination", self.inclination)?;
        require_finite("longitude_ascending_node", self.longitude_ascending_node)?;
        require_finite("argument_perihelion", self.argument_perihelion)?;
        Ok(())
    }

    /// Mean motion (radians per day)
    pub fn mean_motion(&self) -> f64 {
        TAU / self.orbital_period
    }

    /// (P/1yr)² / (a/1AU)³, which is 1 for a body obeying Kepler's third law
    /// around one solar mass
    pub fn third_law_ratio(&self) -> f64 {
        (self.orbital_period / DAYS_PER_YEAR).powi(2) / self.semi_major_axis.powi(3)
    }

    fn orientation(&self) -> Orientation {
        Orientation {
            inclination: self.inclination * DEG_TO_RAD,
            ascending_node: self.longitude_ascending_node * DEG_TO_RAD,
            argument_perihelion: self.argument_perihelion * DEG_TO_RAD,
        }
    }
}

/// Elements of a moon, relative to its parent body. `parent` is looked up
/// by name, never owned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoonOrbitalElements {
    pub name: String,
    pub parent: String,
    /// Semi-major axis (km)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Orbital period (days)
    pub orbital_period: f64,
    /// Inclination to the ecliptic (degrees); > 90 for retrograde moons
    pub inclination: f64,
    pub longitude_ascending_node: f64,
    pub argument_perihelion: f64,
    /// Mean radius (km)
    pub radius: f64,
    pub color: u32,
}

impl MoonOrbitalElements {
    pub fn validate(&self) -> EngineResult<()> {
        if self.parent.is_empty() {
            return Err(EngineError::invalid("parent", "moon must name its parent body"));
        }
        require_positive("semi_major_axis", self.semi_major_axis)?;
        validate_eccentricity(self.eccentricity)?;
        require_positive("orbital_period", self.orbital_period)?;
        require_finite("inclination", self.inclination)?;
        require_finite("longitude_ascending_node", self.longitude_ascending_node)?;
        require_finite("argument_perihelion", self.argument_perihelion)?;
        Ok(())
    }

    pub fn semi_major_axis_au(&self) -> f64 {
        self.semi_major_axis / AU_KM
    }

    fn orientation(&self) -> Orientation {
        Orientation {
            inclination: self.inclination * DEG_TO_RAD,
            ascending_node: self.longitude_ascending_node * DEG_TO_RAD,
            argument_perihelion: self.argument_perihelion * DEG_TO_RAD,
        }
    }
}

fn validate_eccentricity(e: f64) -> EngineResult<()> {
    require_non_negative("eccentricity", e)?;
    if e >= 1.0 {
        return Err(EngineError::invalid(
            "eccentricity",
            format!("{} is not elliptical (parabolic/hyperbolic orbits unsupported)", e),
        ));
    }
    if e > MAX_ECCENTRICITY {
        return Err(EngineError::invalid(
            "eccentricity",
            format!("{} exceeds the supported ceiling {}", e, MAX_ECCENTRICITY),
        ));
    }
    Ok(())
}

/// Orbit orientation angles (radians)
#[derive(Debug, Clone, Copy)]
struct Orientation {
    inclination: f64,
    ascending_node: f64,
    argument_perihelion: f64,
}

impl Orientation {
    /// Rotate an in-plane position at true anomaly ν into the ecliptic frame.
    /// Equivalent to R_z(Ω) · R_x(i) · R_z(ω) applied to (r cos ν, r sin ν, 0).
    fn rotate_to_ecliptic(self, r: f64, true_anomaly: f64) -> Vector3 {
        // Argument of latitude
        let theta = true_anomaly + self.argument_perihelion;
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_o, cos_o) = self.ascending_node.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();

        Vector3::new(
            r * (cos_o * cos_t - sin_o * sin_t * cos_i),
            r * (sin_o * cos_t + cos_o * sin_t * cos_i),
            r * (sin_t * sin_i),
        )
    }
}

// =============================================================================
// ORBITAL STATE
// =============================================================================

/// Derived per request, never persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitalState {
    /// Mean anomaly (radians, [0, 2π))
    pub mean_anomaly: f64,
    /// Eccentric anomaly (radians)
    pub eccentric_anomaly: f64,
    /// True anomaly (radians, [0, 2π))
    pub true_anomaly: f64,
    /// Distance from the focus (AU)
    pub distance: f64,
    /// Heliocentric ecliptic position (AU, z = ecliptic north)
    pub position: Vector3,
    /// Scene position (scene units, y-up)
    pub scene_position: Vector3,
    /// False when the Kepler solve hit its iteration cap
    pub converged: bool,
}

// =============================================================================
// CALCULATOR
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrbitCalculator {
    config: OrbitConfig,
    solver: KeplerSolver,
}

impl OrbitCalculator {
    pub fn new(config: OrbitConfig) -> EngineResult<Self> {
        config.validate()?;
        let solver = config.solver();
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Mean anomaly after `elapsed_days` since perihelion passage at the
    /// reference epoch, with the animation multiplier applied
    pub fn mean_anomaly(&self, elements: &OrbitalElements, elapsed_days: f64) -> EngineResult<f64> {
        elements.validate()?;
        require_finite("elapsed_days", elapsed_days)?;
        mean_anomaly_for(elements.orbital_period, elapsed_days * self.config.time_multiplier)
    }

    /// Full orbital state of a heliocentric body
    pub fn state_at(&self, elements: &OrbitalElements, elapsed_days: f64) -> EngineResult<OrbitalState> {
        let m = self.mean_anomaly(elements, elapsed_days)?;
        Ok(self.solve_state(
            &elements.name,
            m,
            elements.semi_major_axis,
            elements.eccentricity,
            elements.orientation(),
            Vector3::zero(),
        ))
    }

    /// Scene-space position of a heliocentric body
    pub fn position(&self, elements: &OrbitalElements, elapsed_days: f64) -> EngineResult<Vector3> {
        Ok(self.state_at(elements, elapsed_days)?.scene_position)
    }

    /// State of a moon around an already-computed parent state
    pub fn moon_state(
        &self,
        moon: &MoonOrbitalElements,
        parent: &OrbitalState,
        elapsed_days: f64,
    ) -> EngineResult<OrbitalState> {
        moon.validate()?;
        require_finite("elapsed_days", elapsed_days)?;

        let m = mean_anomaly_for(moon.orbital_period, elapsed_days * self.config.time_multiplier)?;
        Ok(self.solve_state(
            &moon.name,
            m,
            moon.semi_major_axis_au(),
            moon.eccentricity,
            moon.orientation(),
            parent.position,
        ))
    }

    fn solve_state(
        &self,
        name: &str,
        mean_anomaly: f64,
        semi_major_axis: f64,
        e: f64,
        orientation: Orientation,
        origin: Vector3,
    ) -> OrbitalState {
        let solution = self.solver.solve(mean_anomaly, e);
        if !solution.converged {
            tracing::warn!(
                body = name,
                mean_anomaly,
                eccentricity = e,
                residual = solution.residual(e),
                "Kepler solve hit iteration cap, using last estimate"
            );
        }

        let eccentric_anomaly = solution.eccentric_anomaly;
        let true_anomaly = true_anomaly(eccentric_anomaly, e);
        let distance = semi_major_axis * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

        let position = orientation.rotate_to_ecliptic(distance, true_anomaly).add(&origin);
        let scene_position = position.ecliptic_to_scene().scale(self.config.au_to_scene);

        OrbitalState {
            mean_anomaly: solution.mean_anomaly,
            eccentric_anomaly,
            true_anomaly,
            distance,
            position,
            scene_position,
            converged: solution.converged,
        }
    }
}

fn mean_anomaly_for(period_days: f64, elapsed_days: f64) -> EngineResult<f64> {
    let phase = TAU / period_days * elapsed_days;
    // Scaled time can still overflow even when both factors are finite
    require_finite("elapsed_days", phase)?;
    Ok(normalize_angle(phase))
}

/// ν from E, in [0, 2π).
/// tan(ν/2) = sqrt((1+e)/(1-e)) · tan(E/2), evaluated with atan2 so E = π stays finite.
pub fn true_anomaly(eccentric_anomaly: f64, e: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    let nu = 2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos());
    normalize_angle(nu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn body(a: f64, e: f64, period: f64) -> OrbitalElements {
        OrbitalElements {
            name: "test".to_string(),
            semi_major_axis: a,
            eccentricity: e,
            orbital_period: period,
            inclination: 0.0,
            longitude_ascending_node: 0.0,
            argument_perihelion: 0.0,
            physical: PhysicalAttributes {
                radius: 1000.0,
                mass: 1.0,
                rotation_period: 24.0,
                axial_tilt: 0.0,
                color: 0xffffff,
                has_rings: false,
                moon_count: 0,
            },
        }
    }

    fn calculator() -> OrbitCalculator {
        OrbitCalculator::new(OrbitConfig::default()).unwrap()
    }

    #[test]
    fn test_circular_orbit_constant_radius() {
        let calc = calculator();
        let elements = body(2.5, 0.0, 1000.0);
        for day in 0..100 {
            let state = calc.state_at(&elements, day as f64 * 13.7).unwrap();
            assert!((state.distance - 2.5).abs() < 1e-12);
            assert!((state.position.magnitude() - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mars_like_start_at_perihelion() {
        let calc = calculator();
        let mars = body(1.524, 0.093, 686.98);
        let state = calc.state_at(&mars, 0.0).unwrap();
        assert_eq!(state.mean_anomaly, 0.0);
        assert!(state.eccentric_anomaly.abs() < 1e-12);
        assert!(state.true_anomaly.abs() < 1e-12);
        assert!((state.distance - 1.524 * (1.0 - 0.093)).abs() < 1e-12);
    }

    #[test]
    fn test_half_period_reaches_aphelion() {
        let calc = calculator();
        let mars = body(1.524, 0.093, 686.98);
        let state = calc.state_at(&mars, 686.98 / 2.0).unwrap();
        assert!((state.true_anomaly - PI).abs() < 1e-6);
        assert!((state.distance - 1.524 * 1.093).abs() < 1e-6);
    }

    #[test]
    fn test_kepler_third_law() {
        assert!((body(1.0, 0.0167, 365.25).third_law_ratio() - 1.0).abs() < 0.01);
        assert!((body(5.2, 0.0489, 4332.6).third_law_ratio() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_time_multiplier_scales_mean_anomaly() {
        let fast = OrbitCalculator::new(OrbitConfig {
            time_multiplier: 10.0,
            ..OrbitConfig::default()
        })
        .unwrap();
        let slow = calculator();
        let elements = body(1.0, 0.0, 365.25);
        let a = fast.mean_anomaly(&elements, 3.0).unwrap();
        let b = slow.mean_anomaly(&elements, 30.0).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_into_ecliptic() {
        let calc = calculator();

        // Polar orbit, node on +x: a quarter period later the body is over the pole
        let mut polar = body(1.0, 0.0, 400.0);
        polar.inclination = 90.0;
        let state = calc.state_at(&polar, 100.0).unwrap();
        assert!(state.position.x.abs() < 1e-9);
        assert!(state.position.y.abs() < 1e-9);
        assert!((state.position.z - 1.0).abs() < 1e-9);

        // Node rotated by 90° in the ecliptic moves perihelion onto +y
        let mut turned = body(1.0, 0.0, 400.0);
        turned.longitude_ascending_node = 90.0;
        let state = calc.state_at(&turned, 0.0).unwrap();
        assert!(state.position.x.abs() < 1e-9);
        assert!((state.position.y - 1.0).abs() < 1e-9);
        assert!(state.position.z.abs() < 1e-12);
    }

    #[test]
    fn test_scene_position_is_scaled_y_up() {
        let calc = OrbitCalculator::new(OrbitConfig {
            au_to_scene: 50.0,
            ..OrbitConfig::default()
        })
        .unwrap();
        let elements = body(1.0, 0.0, 400.0);
        let state = calc.state_at(&elements, 100.0).unwrap();
        // Quarter orbit: ecliptic +y, scene -z
        assert!((state.scene_position.z + 50.0).abs() < 1e-9);
        assert!(state.scene_position.y.abs() < 1e-9);
    }

    #[test]
    fn test_invalid_elements_rejected() {
        let calc = calculator();
        let zero_period = body(1.0, 0.1, 0.0);
        assert_eq!(
            calc.state_at(&zero_period, 10.0).unwrap_err().field(),
            Some("orbital_period")
        );
        let parabolic = body(1.0, 1.0, 365.0);
        assert_eq!(
            calc.state_at(&parabolic, 10.0).unwrap_err().field(),
            Some("eccentricity")
        );
        let near_parabolic = body(1.0, 0.995, 365.0);
        assert!(calc.state_at(&near_parabolic, 10.0).is_err());
        assert!(calc.state_at(&body(1.0, 0.1, 365.0), f64::NAN).is_err());
    }

    #[test]
    fn test_overflowing_scaled_time_rejected() {
        let calc = OrbitCalculator::new(OrbitConfig {
            time_multiplier: 1e300,
            ..OrbitConfig::default()
        })
        .unwrap();
        let err = calc.state_at(&body(1.0, 0.1, 0.5), 1e300).unwrap_err();
        assert_eq!(err.field(), Some("elapsed_days"));
    }

    #[test]
    fn test_moon_orbits_parent() {
        let calc = calculator();
        let earth = body(1.0, 0.0, 365.25);
        let parent = calc.state_at(&earth, 42.0).unwrap();
        let moon = MoonOrbitalElements {
            name: "Moon".to_string(),
            parent: "test".to_string(),
            semi_major_axis: 384_400.0,
            eccentricity: 0.0,
            orbital_period: 27.32,
            inclination: 5.145,
            longitude_ascending_node: 0.0,
            argument_perihelion: 0.0,
            radius: 1737.4,
            color: 0xaaaaaa,
        };
        let state = calc.moon_state(&moon, &parent, 42.0).unwrap();
        let offset = state.position.sub(&parent.position).magnitude();
        assert!((offset - 384_400.0 / AU_KM).abs() < 1e-12);
        assert!((state.distance - 384_400.0 / AU_KM).abs() < 1e-12);
    }

    #[test]
    fn test_true_anomaly_matches_tangent_form() {
        let e: f64 = 0.3;
        for k in 1..10 {
            let ea = k as f64 * 0.3;
            let expected = normalize_angle(2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ea / 2.0).tan()).atan());
            assert!((true_anomaly(ea, e) - expected).abs() < 1e-9);
        }
    }
}

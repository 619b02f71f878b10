// Real-Time Ephemeris - anchors the animation to the calendar date
// Day counts are linear in elapsed milliseconds from J2000 (no leap seconds)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::OrbitConfig;
use crate::error::{require_finite, require_positive, EngineError, EngineResult};
use crate::math::normalize_angle;
use crate::orbit::{MoonOrbitalElements, OrbitCalculator, OrbitalElements, OrbitalState};

/// 2000-01-01T12:00:00Z as Unix milliseconds
pub const J2000_UNIX_MS: i64 = 946_728_000_000;

/// Julian Date of the J2000 epoch
pub const J2000_JD: f64 = 2451545.0;

const MS_PER_DAY: i64 = 86_400_000;

pub fn j2000() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(J2000_UNIX_MS)
}

/// Days since J2000, fractional
pub fn days_since_epoch(date: &DateTime<Utc>) -> f64 {
    let ms = date.timestamp_millis() - J2000_UNIX_MS;
    // Whole days and the remainder are converted separately so dates a whole
    // number of days apart share the same fractional part
    let whole = ms.div_euclid(MS_PER_DAY) as f64;
    let fraction = ms.rem_euclid(MS_PER_DAY) as f64 / MS_PER_DAY as f64;
    whole + fraction
}

pub fn julian_date(date: &DateTime<Utc>) -> f64 {
    J2000_JD + days_since_epoch(date)
}

/// Advance a real-date phase by an animation clock.
/// `clock_days` is the animation's own running time, already in days.
pub fn animated_angle(
    initial_angle: f64,
    clock_days: f64,
    orbital_period: f64,
    time_multiplier: f64,
) -> EngineResult<f64> {
    require_positive("orbital_period", orbital_period)?;
    require_finite("clock_days", clock_days)?;
    require_finite("time_multiplier", time_multiplier)?;
    Ok(normalize_angle(
        initial_angle + TAU / orbital_period * clock_days * time_multiplier,
    ))
}

// =============================================================================
// SNAPSHOT TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyPhase {
    pub name: String,
    /// True anomaly at the snapshot moment (radians)
    pub initial_angle: f64,
    pub state: OrbitalState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisSnapshot {
    pub date: DateTime<Utc>,
    pub julian_date: f64,
    pub days_since_epoch: f64,
    pub planets: Vec<BodyPhase>,
    pub moons: Vec<BodyPhase>,
}

impl EphemerisSnapshot {
    pub fn body(&self, name: &str) -> Option<&BodyPhase> {
        self.planets
            .iter()
            .chain(self.moons.iter())
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// EPHEMERIS
// =============================================================================

pub struct RealTimeEphemeris {
    calculator: OrbitCalculator,
}

impl RealTimeEphemeris {
    /// The animation multiplier in `config` is ignored: phases are always
    /// taken at the real moment.
    pub fn new(config: &OrbitConfig) -> EngineResult<Self> {
        let real_time = OrbitConfig {
            time_multiplier: 1.0,
            ..config.clone()
        };
        Ok(Self {
            calculator: OrbitCalculator::new(real_time)?,
        })
    }

    pub fn state_at_date(
        &self,
        elements: &OrbitalElements,
        date: &DateTime<Utc>,
    ) -> EngineResult<OrbitalState> {
        self.state_at_days(elements, days_since_epoch(date))
    }

    /// State at a day count relative to J2000
    pub fn state_at_days(&self, elements: &OrbitalElements, days: f64) -> EngineResult<OrbitalState> {
        self.calculator.state_at(elements, days)
    }

    /// True anomaly of the body at `date`, used as the animation's phase offset
    pub fn initial_angle(&self, elements: &OrbitalElements, date: &DateTime<Utc>) -> EngineResult<f64> {
        Ok(self.state_at_date(elements, date)?.true_anomaly)
    }

    /// Phases of every planet, and of every moon whose parent is among them
    pub fn snapshot(
        &self,
        date: &DateTime<Utc>,
        planets: &[OrbitalElements],
        moons: &[MoonOrbitalElements],
    ) -> EngineResult<EphemerisSnapshot> {
        let days = days_since_epoch(date);

        let mut planet_phases = Vec::with_capacity(planets.len());
        for elements in planets {
            let state = self.calculator.state_at(elements, days)?;
            planet_phases.push(BodyPhase {
                name: elements.name.clone(),
                initial_angle: state.true_anomaly,
                state,
            });
        }

        let mut moon_phases = Vec::with_capacity(moons.len());
        for moon in moons {
            let parent = planet_phases
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&moon.parent))
                .ok_or_else(|| EngineError::UnknownBody(moon.parent.clone()))?;
            let state = self.calculator.moon_state(moon, &parent.state, days)?;
            moon_phases.push(BodyPhase {
                name: moon.name.clone(),
                initial_angle: state.true_anomaly,
                state,
            });
        }

        Ok(EphemerisSnapshot {
            date: *date,
            julian_date: J2000_JD + days,
            days_since_epoch: days,
            planets: planet_phases,
            moons: moon_phases,
        })
    }

    /// Snapshot at the current wall-clock time
    pub fn snapshot_now(
        &self,
        planets: &[OrbitalElements],
        moons: &[MoonOrbitalElements],
    ) -> EngineResult<EphemerisSnapshot> {
        self.snapshot(&Utc::now(), planets, moons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_is_zero() {
        assert_eq!(days_since_epoch(&j2000()), 0.0);
        assert_eq!(julian_date(&j2000()), J2000_JD);
        assert_eq!(j2000(), Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_one_day_apart() {
        let a = Utc.with_ymd_and_hms(2024, 3, 10, 7, 31, 12).unwrap();
        let b = a + Duration::days(1);
        assert_eq!(days_since_epoch(&b) - days_since_epoch(&a), 1.0);

        let before = Utc.with_ymd_and_hms(1987, 6, 1, 0, 0, 0).unwrap();
        let after = before + Duration::days(1);
        assert_eq!(days_since_epoch(&after) - days_since_epoch(&before), 1.0);
    }

    #[test]
    fn test_monotonic_and_linear() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut previous = days_since_epoch(&start);
        for hours in 1..100 {
            let d = days_since_epoch(&(start + Duration::hours(hours)));
            assert!(d > previous);
            assert!((d - days_since_epoch(&start) - hours as f64 / 24.0).abs() < 1e-9);
            previous = d;
        }
    }

    #[test]
    fn test_initial_angle_follows_calendar() {
        let eph = RealTimeEphemeris::new(&OrbitConfig::default()).unwrap();
        let mars = catalog::find_planet("Mars").unwrap();

        assert!(eph.initial_angle(&mars, &j2000()).unwrap().abs() < 1e-12);

        // Half a Martian year after J2000 the phase is at aphelion
        let half = j2000() + Duration::milliseconds((686.980 / 2.0 * 86_400_000.0) as i64);
        let angle = eph.initial_angle(&mars, &half).unwrap();
        assert!((angle - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_ignores_animation_multiplier() {
        let fast = RealTimeEphemeris::new(&OrbitConfig {
            time_multiplier: 500.0,
            ..OrbitConfig::default()
        })
        .unwrap();
        let real = RealTimeEphemeris::new(&OrbitConfig::default()).unwrap();
        let earth = catalog::find_planet("Earth").unwrap();
        let date = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        assert_eq!(
            fast.initial_angle(&earth, &date).unwrap(),
            real.initial_angle(&earth, &date).unwrap()
        );
    }

    #[test]
    fn test_snapshot_covers_catalog() {
        let eph = RealTimeEphemeris::new(&OrbitConfig::default()).unwrap();
        let date = Utc.with_ymd_and_hms(2030, 5, 4, 18, 0, 0).unwrap();
        let snapshot = eph
            .snapshot(&date, &catalog::planets(), &catalog::moons())
            .unwrap();
        assert_eq!(snapshot.planets.len(), 8);
        assert_eq!(snapshot.moons.len(), catalog::moons().len());

        let earth = snapshot.body("Earth").unwrap();
        let moon = snapshot.body("Moon").unwrap();
        let separation = moon.state.position.sub(&earth.state.position).magnitude();
        assert!(separation < 0.003);
        for body in snapshot.planets.iter().chain(snapshot.moons.iter()) {
            assert!(body.state.position.is_finite());
            assert!((0.0..std::f64::consts::TAU).contains(&body.initial_angle));
        }
    }

    #[test]
    fn test_snapshot_rejects_orphan_moon() {
        let eph = RealTimeEphemeris::new(&OrbitConfig::default()).unwrap();
        let earth_only = vec![catalog::find_planet("Earth").unwrap()];
        let result = eph.snapshot(&j2000(), &earth_only, &catalog::moons_of("Mars"));
        assert!(matches!(result, Err(EngineError::UnknownBody(_))));
    }

    #[test]
    fn test_animated_angle() {
        let angle = animated_angle(1.0, 365.25 / 4.0, 365.25, 1.0).unwrap();
        assert!((angle - (1.0 + std::f64::consts::FRAC_PI_2)).abs() < 1e-12);
        assert!(animated_angle(0.0, 1.0, 0.0, 1.0).is_err());
    }
}

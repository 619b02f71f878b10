// Scene Context - thread-safe owner of the generated scene and its clock
// Handed to the render/UI layers explicitly instead of living in a global

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::buffers::{to_buffers, RenderBuffers};
use crate::config::{GalaxyConfig, OrbitConfig};
use crate::ephemeris::{days_since_epoch, RealTimeEphemeris};
use crate::error::{require_finite, EngineResult};
use crate::orbit::{OrbitalElements, OrbitalState};
use crate::starfield::{ResonanceGroup, SpectrumLine, Starfield, StarfieldGenerator};

const SECONDS_PER_DAY: f64 = 86_400.0;

// =============================================================================
// ANIMATION CLOCK
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimationClock {
    /// Days since J2000 at the moment the scene was anchored
    pub start_days: f64,
    /// Animation time accumulated since then (days, before the multiplier)
    pub elapsed_days: f64,
    pub time_multiplier: f64,
    pub is_paused: bool,
}

impl AnimationClock {
    pub fn new(start: &DateTime<Utc>, time_multiplier: f64) -> Self {
        Self {
            start_days: days_since_epoch(start),
            elapsed_days: 0.0,
            time_multiplier,
            is_paused: false,
        }
    }

    /// Days since J2000 the scene is currently showing
    pub fn simulated_days(&self) -> f64 {
        self.start_days + self.elapsed_days * self.time_multiplier
    }
}

// =============================================================================
// SCENE CONTEXT
// =============================================================================

pub struct SceneContext {
    starfield: Arc<RwLock<Starfield>>,
    rng: Mutex<ChaCha8Rng>,
    ephemeris: RealTimeEphemeris,
    clock: RwLock<AnimationClock>,
}

impl SceneContext {
    /// Generate the initial starfield and anchor the clock at `start`
    pub fn new(
        galaxy: GalaxyConfig,
        orbit: OrbitConfig,
        start: DateTime<Utc>,
        seed: u64,
    ) -> EngineResult<Self> {
        orbit.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let starfield = StarfieldGenerator::new(galaxy)?.generate(&mut rng)?;

        Ok(Self {
            starfield: Arc::new(RwLock::new(starfield)),
            rng: Mutex::new(rng),
            ephemeris: RealTimeEphemeris::new(&orbit)?,
            clock: RwLock::new(AnimationClock::new(&start, orbit.time_multiplier)),
        })
    }

    /// Shared handle for layers that hold on to the starfield
    pub fn starfield_handle(&self) -> Arc<RwLock<Starfield>> {
        self.starfield.clone()
    }

    pub fn with_starfield<T>(&self, f: impl FnOnce(&Starfield) -> T) -> T {
        f(&self.starfield.read())
    }

    /// Replace the whole starfield. On invalid config the previous one stays.
    pub fn regenerate(&self, config: GalaxyConfig) -> EngineResult<()> {
        let generator = StarfieldGenerator::new(config)?;
        let starfield = {
            let mut rng = self.rng.lock();
            generator.generate(&mut *rng)?
        };

        tracing::info!(
            stars = starfield.stars.len(),
            dark_matter_nodes = starfield.dark_matter.nodes.len(),
            "starfield regenerated"
        );

        *self.starfield.write() = starfield;
        Ok(())
    }

    /// Dark-matter density step; `time` is absolute animation time in seconds
    pub fn tick(&self, time: f64) -> EngineResult<()> {
        self.starfield.write().dark_matter.tick(time)
    }

    pub fn star_buffers(&self) -> RenderBuffers {
        to_buffers(&self.starfield.read().stars)
    }

    pub fn dark_matter_buffers(&self) -> RenderBuffers {
        to_buffers(&self.starfield.read().dark_matter.nodes)
    }

    pub fn frequency_spectrum(&self) -> Vec<SpectrumLine> {
        self.starfield.read().frequency_spectrum()
    }

    pub fn resonance_groups(&self) -> Vec<ResonanceGroup> {
        self.starfield.read().resonance_groups()
    }

    // -------------------------------------------------------------------------
    // Clock
    // -------------------------------------------------------------------------

    pub fn clock(&self) -> AnimationClock {
        *self.clock.read()
    }

    /// Advance by real frame time; no-op while paused
    pub fn advance(&self, real_dt_seconds: f64) -> EngineResult<()> {
        require_finite("real_dt_seconds", real_dt_seconds)?;
        let mut clock = self.clock.write();
        if !clock.is_paused {
            clock.elapsed_days += real_dt_seconds / SECONDS_PER_DAY;
        }
        Ok(())
    }

    pub fn set_paused(&self, paused: bool) {
        self.clock.write().is_paused = paused;
    }

    /// Changing speed keeps the currently shown date in place
    pub fn set_time_multiplier(&self, multiplier: f64) -> EngineResult<()> {
        require_finite("time_multiplier", multiplier)?;
        let mut clock = self.clock.write();
        clock.start_days = clock.simulated_days();
        clock.elapsed_days = 0.0;
        clock.time_multiplier = multiplier;
        Ok(())
    }

    /// Re-anchor the clock to a calendar date
    pub fn jump_to(&self, date: &DateTime<Utc>) {
        let mut clock = self.clock.write();
        clock.start_days = days_since_epoch(date);
        clock.elapsed_days = 0.0;
    }

    /// States of the given bodies at the clock's current simulated date
    pub fn planet_states(&self, planets: &[OrbitalElements]) -> EngineResult<Vec<OrbitalState>> {
        let days = self.clock.read().simulated_days();
        planets
            .iter()
            .map(|p| self.ephemeris.state_at_days(p, days))
            .collect()
    }
}

// Orrery - numerical core of the celestial scene
// Keplerian ephemeris for the solar system and a procedural zoned galaxy

pub mod buffers;
pub mod catalog;
pub mod config;
pub mod dark_matter;
pub mod ephemeris;
pub mod error;
pub mod kepler;
pub mod math;
pub mod orbit;
pub mod scene;
pub mod starfield;

pub use buffers::{to_buffers, RenderBuffers, Renderable};
pub use config::{GalaxyConfig, OrbitConfig, ZoneSelection};
pub use dark_matter::{DarkMatterHalo, DarkMatterNode};
pub use ephemeris::{days_since_epoch, julian_date, EphemerisSnapshot, RealTimeEphemeris};
pub use error::{EngineError, EngineResult};
pub use kepler::{solve_kepler, KeplerSolution, KeplerSolver};
pub use math::{Color, Vector3};
pub use orbit::{MoonOrbitalElements, OrbitCalculator, OrbitalElements, OrbitalState, PhysicalAttributes};
pub use scene::{AnimationClock, SceneContext};
pub use starfield::{
    zone_targets, GravitationalZone, ResonanceGroup, SpectrumLine, StarRecord, Starfield,
    StarfieldGenerator, StellarType,
};

// Starfield Generator - zoned stellar population for the galaxy view
// Stars are placed per gravitational zone; disk stars follow the spiral arms

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::config::{GalaxyConfig, ZoneSelection};
use crate::dark_matter::DarkMatterHalo;
use crate::error::EngineResult;
use crate::math::{clustered_jitter, point_on_sphere, radius_in_shell, Color, Vector3};

/// Lightest and heaviest stellar masses produced (solar masses)
pub const MIN_STAR_MASS: f64 = 0.08;
pub const MAX_STAR_MASS: f64 = 60.0;

/// Salpeter initial mass function slope
const IMF_SLOPE: f64 = -2.35;

/// Radii below this fraction of the galaxy radius are treated as this value
/// when deriving orbital frequencies
const MIN_FREQUENCY_RADIUS: f64 = 0.01;

// =============================================================================
// ZONES
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GravitationalZone {
    Core,
    Bulge,
    Disk,
    Halo,
}

/// Placement and population statistics of one zone
#[derive(Debug, Clone, Copy)]
pub struct ZoneSpec {
    /// Inner radius as a fraction of galaxy radius
    pub inner: f64,
    /// Outer radius as a fraction of galaxy radius
    pub outer: f64,
    /// Share of the total star count
    pub weight: f64,
    /// Mass range sampled before type constraints (solar masses)
    pub mass_range: (f64, f64),
    pub type_weights: &'static [(StellarType, f64)],
}

const CORE: ZoneSpec = ZoneSpec {
    inner: 0.0,
    outer: 0.10,
    weight: 0.05,
    mass_range: (0.8, MAX_STAR_MASS),
    type_weights: &[
        (StellarType::MainSequence, 0.35),
        (StellarType::Giant, 0.20),
        (StellarType::Supergiant, 0.15),
        (StellarType::NeutronStar, 0.18),
        (StellarType::BlackHole, 0.12),
    ],
};

const BULGE: ZoneSpec = ZoneSpec {
    inner: 0.10,
    outer: 0.30,
    weight: 0.20,
    mass_range: (0.5, 25.0),
    type_weights: &[
        (StellarType::MainSequence, 0.50),
        (StellarType::Giant, 0.28),
        (StellarType::Supergiant, 0.04),
        (StellarType::WhiteDwarf, 0.10),
        (StellarType::NeutronStar, 0.05),
        (StellarType::BlackHole, 0.03),
    ],
};

const DISK: ZoneSpec = ZoneSpec {
    inner: 0.30,
    outer: 1.00,
    weight: 0.60,
    mass_range: (0.1, 40.0),
    type_weights: &[
        (StellarType::MainSequence, 0.76),
        (StellarType::Giant, 0.08),
        (StellarType::Supergiant, 0.03),
        (StellarType::WhiteDwarf, 0.10),
        (StellarType::NeutronStar, 0.02),
        (StellarType::BlackHole, 0.01),
    ],
};

const HALO: ZoneSpec = ZoneSpec {
    inner: 1.00,
    outer: 1.50,
    weight: 0.15,
    mass_range: (MIN_STAR_MASS, 1.2),
    type_weights: &[
        (StellarType::MainSequence, 0.55),
        (StellarType::WhiteDwarf, 0.35),
        (StellarType::Giant, 0.07),
        (StellarType::NeutronStar, 0.02),
        (StellarType::BlackHole, 0.01),
    ],
};

impl GravitationalZone {
    /// Innermost first
    pub const ALL: [GravitationalZone; 4] = [
        GravitationalZone::Core,
        GravitationalZone::Bulge,
        GravitationalZone::Disk,
        GravitationalZone::Halo,
    ];

    pub fn spec(&self) -> &'static ZoneSpec {
        match self {
            Self::Core => &CORE,
            Self::Bulge => &BULGE,
            Self::Disk => &DISK,
            Self::Halo => &HALO,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Core => 0,
            Self::Bulge => 1,
            Self::Disk => 2,
            Self::Halo => 3,
        }
    }

    /// Radius band in scene units
    pub fn radius_band(&self, galaxy_radius: f64) -> (f64, f64) {
        let spec = self.spec();
        (spec.inner * galaxy_radius, spec.outer * galaxy_radius)
    }

    fn sample_type<R: Rng + ?Sized>(&self, rng: &mut R) -> StellarType {
        let table = self.spec().type_weights;
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        let mut pick = rng.gen::<f64>() * total;
        for (stellar_type, weight) in table {
            if pick < *weight {
                return *stellar_type;
            }
            pick -= weight;
        }
        table[table.len() - 1].0
    }
}

/// Outer edge of the outermost zone, as a fraction of galaxy radius
pub fn outer_extent() -> f64 {
    HALO.outer
}

/// Per-zone star targets by largest-remainder apportionment. Always sums to
/// `star_count`; ties in the remainder go to the inner zone.
pub fn zone_targets(star_count: usize) -> [usize; 4] {
    let mut targets = [0usize; 4];
    let mut remainders = [(0usize, 0.0f64); 4];

    for zone in GravitationalZone::ALL {
        let i = zone.index();
        let exact = star_count as f64 * zone.spec().weight;
        targets[i] = exact.floor() as usize;
        remainders[i] = (i, exact - exact.floor());
    }

    let assigned: usize = targets.iter().sum();
    let leftover = star_count.saturating_sub(assigned);

    // Stable sort keeps zone order among equal remainders
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (i, _) in remainders.iter().cycle().take(leftover) {
        targets[*i] += 1;
    }

    targets
}

// =============================================================================
// STELLAR TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StellarType {
    MainSequence,
    Giant,
    Supergiant,
    WhiteDwarf,
    NeutronStar,
    BlackHole,
}

impl StellarType {
    pub fn is_compact(&self) -> bool {
        matches!(self, Self::WhiteDwarf | Self::NeutronStar | Self::BlackHole)
    }

    /// Pull a sampled mass into the range this type can physically have
    pub fn constrain_mass(&self, mass: f64) -> f64 {
        match self {
            Self::MainSequence => mass.clamp(MIN_STAR_MASS, MAX_STAR_MASS),
            Self::Giant => mass.clamp(0.8, 8.0),
            Self::Supergiant => mass.clamp(10.0, MAX_STAR_MASS),
            Self::WhiteDwarf => mass.clamp(0.5, 1.4),
            Self::NeutronStar => mass.clamp(1.1, 2.3),
            Self::BlackHole => mass.clamp(5.0, MAX_STAR_MASS),
        }
    }

    /// Luminosity in solar units
    pub fn luminosity(&self, mass: f64) -> f64 {
        match self {
            Self::MainSequence => mass.powf(3.5),
            Self::Giant => 100.0 * mass * mass,
            Self::Supergiant => 1.0e4 * (mass / 10.0).powi(2),
            Self::WhiteDwarf => 1.0e-3 * mass,
            Self::NeutronStar => 1.0e-4,
            Self::BlackHole => 0.0,
        }
    }

    /// Point size handed to the renderer
    pub fn visual_size(&self, mass: f64) -> f64 {
        match self {
            Self::MainSequence => (0.6 * mass.powf(0.4)).clamp(0.3, 3.0),
            Self::Giant => (1.6 * mass.powf(0.3)).clamp(1.5, 3.5),
            Self::Supergiant => (2.5 * (mass / 10.0).powf(0.3)).clamp(2.5, 5.0),
            Self::WhiteDwarf => 0.25,
            Self::NeutronStar => 0.15,
            Self::BlackHole => 0.2,
        }
    }

    pub fn color(&self, mass: f64) -> Color {
        match self {
            Self::MainSequence => main_sequence_color(mass),
            Self::Giant => Color::new(1.0, 0.62, 0.32),
            Self::Supergiant if mass > 20.0 => Color::new(0.7, 0.8, 1.0),
            Self::Supergiant => Color::new(1.0, 0.42, 0.22),
            Self::WhiteDwarf => Color::new(0.85, 0.9, 1.0),
            Self::NeutronStar => Color::new(0.6, 0.5, 1.0),
            Self::BlackHole => Color::new(0.3, 0.1, 0.4),
        }
    }
}

/// Effective temperature T ≈ 5778 K · M^0.505, mapped onto a blackbody ramp
fn main_sequence_color(mass: f64) -> Color {
    const RAMP: [(f64, Color); 5] = [
        (3000.0, Color::new(1.0, 0.45, 0.25)),
        (5000.0, Color::new(1.0, 0.8, 0.6)),
        (5800.0, Color::new(1.0, 0.96, 0.9)),
        (7500.0, Color::new(0.85, 0.9, 1.0)),
        (10000.0, Color::new(0.6, 0.7, 1.0)),
    ];

    let temperature = 5778.0 * mass.powf(0.505);
    if temperature <= RAMP[0].0 {
        return RAMP[0].1;
    }
    for pair in RAMP.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if temperature <= t1 {
            return c0.lerp(&c1, ((temperature - t0) / (t1 - t0)) as f32);
        }
    }
    RAMP[RAMP.len() - 1].1
}

// =============================================================================
// STAR RECORD
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarRecord {
    /// Scene position (y-up, disk in the XZ plane)
    pub position: Vector3,
    /// Radius the star was placed at: planar for disk stars, spherical otherwise
    pub orbital_radius: f64,
    /// Solar masses
    pub mass: f64,
    /// Solar luminosities
    pub luminosity: f64,
    pub color: Color,
    pub size: f64,
    pub stellar_type: StellarType,
    pub zone: GravitationalZone,
    /// Stylized gravitational-wave frequency (Hz), within the configured range
    pub gravitational_wave_frequency: Option<f64>,
    /// Relative strength of the frequency line, 0..=1
    pub wave_amplitude: Option<f64>,
    pub resonance_harmonic: Option<u32>,
}

/// One line of the sonification spectrum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpectrumLine {
    pub frequency: f64,
    pub amplitude: f64,
}

/// Stars sharing a resonance harmonic, as indices into `Starfield::stars`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResonanceGroup {
    pub harmonic: u32,
    pub members: Vec<usize>,
}

// =============================================================================
// FREQUENCY MAPPING
// =============================================================================

/// Maps f ∝ sqrt(G·M/r³) onto the audible range on a log scale.
/// Not physically exact; it only has to be monotonic and bounded.
#[derive(Debug, Clone, Copy)]
struct FrequencyMap {
    central_mass: f64,
    galaxy_radius: f64,
    log_raw_min: f64,
    log_raw_span: f64,
    log_out_min: f64,
    log_out_span: f64,
    range: (f64, f64),
}

impl FrequencyMap {
    fn new(config: &GalaxyConfig) -> Self {
        let raw_min = Self::raw(config.central_mass, 0.0, outer_extent());
        let raw_max = Self::raw(config.central_mass, MAX_STAR_MASS, MIN_FREQUENCY_RADIUS);
        let (low, high) = config.frequency_range;

        Self {
            central_mass: config.central_mass,
            galaxy_radius: config.galaxy_radius,
            log_raw_min: raw_min.ln(),
            log_raw_span: (raw_max.ln() - raw_min.ln()).max(f64::EPSILON),
            log_out_min: low.ln(),
            log_out_span: high.ln() - low.ln(),
            range: (low, high),
        }
    }

    /// Twice the orbital frequency, with G absorbed into the scale
    fn raw(central_mass: f64, mass: f64, radius_fraction: f64) -> f64 {
        2.0 * ((central_mass + mass) / radius_fraction.powi(3)).sqrt()
    }

    fn radius_fraction(&self, radius: f64) -> f64 {
        (radius / self.galaxy_radius).max(MIN_FREQUENCY_RADIUS)
    }

    fn frequency(&self, mass: f64, radius: f64) -> f64 {
        let raw = Self::raw(self.central_mass, mass, self.radius_fraction(radius));
        let t = (raw.ln() - self.log_raw_min) / self.log_raw_span;
        let f = (self.log_out_min + t * self.log_out_span).exp();
        f.clamp(self.range.0, self.range.1)
    }

    fn amplitude(&self, mass: f64, radius: f64) -> f64 {
        let r = self.radius_fraction(radius);
        ((mass / MAX_STAR_MASS).sqrt() / (1.0 + r)).clamp(0.0, 1.0)
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Stars plus the dark-matter halo generated with them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Starfield {
    pub config: GalaxyConfig,
    pub stars: Vec<StarRecord>,
    /// Empty when dark matter is disabled
    pub dark_matter: DarkMatterHalo,
}

impl Starfield {
    pub fn zone_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for star in &self.stars {
            counts[star.zone.index()] += 1;
        }
        counts
    }

    pub fn stars_in_zone(&self, zone: GravitationalZone) -> impl Iterator<Item = &StarRecord> {
        self.stars.iter().filter(move |s| s.zone == zone)
    }

    /// Frequency lines in star order; empty when gravitational waves are off
    pub fn frequency_spectrum(&self) -> Vec<SpectrumLine> {
        self.stars
            .iter()
            .filter_map(|s| {
                Some(SpectrumLine {
                    frequency: s.gravitational_wave_frequency?,
                    amplitude: s.wave_amplitude?,
                })
            })
            .collect()
    }

    /// One group per configured harmonic, in configured order
    pub fn resonance_groups(&self) -> Vec<ResonanceGroup> {
        if !self.config.enable_orbital_resonance {
            return Vec::new();
        }

        let harmonics = &self.config.resonance_harmonics;
        let mut groups: Vec<ResonanceGroup> = harmonics
            .iter()
            .map(|&harmonic| ResonanceGroup {
                harmonic,
                members: Vec::new(),
            })
            .collect();

        for (i, star) in self.stars.iter().enumerate() {
            let bucket = resonance_bucket(star.orbital_radius, self.config.galaxy_radius, harmonics.len());
            if let Some(group) = groups.get_mut(bucket) {
                group.members.push(i);
            }
        }

        groups
    }
}

/// Bucket of normalized radius within `bucket_count` equal bands
fn resonance_bucket(radius: f64, galaxy_radius: f64, bucket_count: usize) -> usize {
    let fraction = (radius / (galaxy_radius * outer_extent())).clamp(0.0, 1.0);
    ((fraction * bucket_count as f64) as usize).min(bucket_count.saturating_sub(1))
}

pub struct StarfieldGenerator {
    config: GalaxyConfig,
    frequencies: FrequencyMap,
}

impl StarfieldGenerator {
    pub fn new(config: GalaxyConfig) -> EngineResult<Self> {
        config.validate()?;
        let frequencies = FrequencyMap::new(&config);
        Ok(Self {
            config,
            frequencies,
        })
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    /// Regenerate the full starfield. Output length always equals
    /// `star_count`; content depends only on the config and `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<Starfield> {
        let n = self.config.star_count;
        let mut stars = Vec::with_capacity(n);
        let mut remaining = zone_targets(n);

        for index in 0..n {
            let zone = match self.config.zone_selection {
                ZoneSelection::Quota => draw_from_quota(&mut remaining, rng),
                ZoneSelection::Sampled => draw_weighted_zone(rng),
            };
            stars.push(self.create_star(index, zone, rng));
        }

        let dark_matter = if self.config.enable_dark_matter {
            DarkMatterHalo::generate(
                rng,
                self.config.dark_matter_nodes,
                self.config.galaxy_radius,
                self.config.dark_matter_density,
                self.config.oscillation_amplitude,
            )?
        } else {
            DarkMatterHalo::empty(self.config.oscillation_amplitude)
        };

        let starfield = Starfield {
            config: self.config.clone(),
            stars,
            dark_matter,
        };

        let counts = starfield.zone_counts();
        tracing::debug!(
            core = counts[0],
            bulge = counts[1],
            disk = counts[2],
            halo = counts[3],
            dark_matter_nodes = starfield.dark_matter.nodes.len(),
            "starfield generated"
        );

        Ok(starfield)
    }

    fn create_star<R: Rng + ?Sized>(&self, index: usize, zone: GravitationalZone, rng: &mut R) -> StarRecord {
        let (position, orbital_radius) = match zone {
            GravitationalZone::Disk => self.place_on_arm(index, rng),
            _ => {
                let (inner, outer) = zone.radius_band(self.config.galaxy_radius);
                let r = radius_in_shell(rng, inner, outer);
                (point_on_sphere(rng, r), r)
            }
        };

        let stellar_type = zone.sample_type(rng);
        let (lo, hi) = zone.spec().mass_range;
        let mass = stellar_type.constrain_mass(sample_power_law(lo, hi, IMF_SLOPE, rng));

        let (gravitational_wave_frequency, wave_amplitude) = if self.config.enable_gravitational_waves {
            (
                Some(self.frequencies.frequency(mass, orbital_radius)),
                Some(self.frequencies.amplitude(mass, orbital_radius)),
            )
        } else {
            (None, None)
        };

        let resonance_harmonic = if self.config.enable_orbital_resonance {
            let harmonics = &self.config.resonance_harmonics;
            let bucket = resonance_bucket(orbital_radius, self.config.galaxy_radius, harmonics.len());
            harmonics.get(bucket).copied()
        } else {
            None
        };

        StarRecord {
            position,
            orbital_radius,
            mass,
            luminosity: stellar_type.luminosity(mass),
            color: stellar_type.color(mass),
            size: stellar_type.visual_size(mass),
            stellar_type,
            zone,
            gravitational_wave_frequency,
            wave_amplitude,
            resonance_harmonic,
        }
    }

    /// Spiral-arm placement: arm from index, log-spiral winding, cubic clustering
    fn place_on_arm<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> (Vector3, f64) {
        let radius = self.config.galaxy_radius;
        let (inner, outer) = GravitationalZone::Disk.radius_band(radius);

        // Uniform by area across the band
        let u: f64 = rng.gen();
        let r = (inner * inner + u * (outer * outer - inner * inner)).sqrt();

        let arms = self.config.spiral_arms as usize;
        let branch = (index % arms) as f64 / arms as f64 * TAU;
        let scale_length = 0.1 * radius;
        let spin = self.config.spiral_tightness * PI * (1.0 + r / scale_length).ln();

        let angle = branch + spin + clustered_jitter(rng) * self.config.arm_spread;
        let r = (r + clustered_jitter(rng) * self.config.arm_spread * 0.1 * radius).clamp(inner, outer);
        let height =
            clustered_jitter(rng) * self.config.disk_thickness * radius * (1.0 - 0.5 * r / radius);

        (Vector3::new(r * angle.cos(), height, r * angle.sin()), r)
    }
}

/// Pick a zone weighted by each zone's unfilled quota, then consume one slot
fn draw_from_quota<R: Rng + ?Sized>(remaining: &mut [usize; 4], rng: &mut R) -> GravitationalZone {
    let total: usize = remaining.iter().sum();
    // Callers never draw more than the quotas hold; fall back to the disk if they do
    if total == 0 {
        return GravitationalZone::Disk;
    }

    let mut pick = rng.gen_range(0..total);
    for zone in GravitationalZone::ALL {
        let slot = &mut remaining[zone.index()];
        if pick < *slot {
            *slot -= 1;
            return zone;
        }
        pick -= *slot;
    }
    GravitationalZone::Disk
}

fn draw_weighted_zone<R: Rng + ?Sized>(rng: &mut R) -> GravitationalZone {
    let mut pick: f64 = rng.gen();
    for zone in GravitationalZone::ALL {
        let weight = zone.spec().weight;
        if pick < weight {
            return zone;
        }
        pick -= weight;
    }
    GravitationalZone::Halo
}

/// Inverse-transform sample of p(x) ∝ x^α on [x_min, x_max]
fn sample_power_law<R: Rng + ?Sized>(x_min: f64, x_max: f64, alpha: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.gen();
    let alpha1 = alpha + 1.0;
    (u * (x_max.powf(alpha1) - x_min.powf(alpha1)) + x_min.powf(alpha1))
        .powf(1.0 / alpha1)
        .clamp(x_min, x_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config(star_count: usize) -> GalaxyConfig {
        GalaxyConfig {
            star_count,
            dark_matter_nodes: 20,
            ..GalaxyConfig::default()
        }
    }

    fn generate(config: GalaxyConfig, seed: u64) -> Starfield {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        StarfieldGenerator::new(config).unwrap().generate(&mut rng).unwrap()
    }

    #[test]
    fn test_zone_weights_sum_to_one() {
        let total: f64 = GravitationalZone::ALL.iter().map(|z| z.spec().weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zone_targets_sum_to_total() {
        for n in [0, 1, 2, 3, 7, 19, 20, 99, 1001, 20_000, 33_333] {
            let targets = zone_targets(n);
            assert_eq!(targets.iter().sum::<usize>(), n, "n = {}", n);
        }
        assert_eq!(zone_targets(100), [5, 20, 60, 15]);
        // 0.05 / 0.20 / 0.60 / 0.15 of 7 -> remainders .35 .40 .20 .05
        assert_eq!(zone_targets(7), [0, 2, 4, 1]);
    }

    #[test]
    fn test_generates_exact_star_count() {
        for n in [0, 1, 13, 2500] {
            let field = generate(small_config(n), 3);
            assert_eq!(field.stars.len(), n);
            assert_eq!(field.zone_counts().iter().sum::<usize>(), n);
            let filtered: usize = GravitationalZone::ALL
                .iter()
                .map(|z| field.stars_in_zone(*z).count())
                .sum();
            assert_eq!(filtered, n);
        }
    }

    #[test]
    fn test_quota_selection_hits_targets() {
        let field = generate(small_config(3001), 11);
        assert_eq!(field.zone_counts(), zone_targets(3001));
    }

    #[test]
    fn test_sampled_selection_near_weights() {
        let config = GalaxyConfig {
            zone_selection: ZoneSelection::Sampled,
            ..small_config(20_000)
        };
        let field = generate(config, 5);
        assert_eq!(field.stars.len(), 20_000);
        for zone in GravitationalZone::ALL {
            let share = field.zone_counts()[zone.index()] as f64 / 20_000.0;
            assert!(
                (share - zone.spec().weight).abs() < 0.02,
                "{:?}: {}",
                zone,
                share
            );
        }
    }

    #[test]
    fn test_stars_stay_in_zone_band() {
        let field = generate(small_config(5000), 21);
        let radius = field.config.galaxy_radius;
        for star in &field.stars {
            let (inner, outer) = star.zone.radius_band(radius);
            let measured = match star.zone {
                GravitationalZone::Disk => star.position.planar_magnitude(),
                _ => star.position.magnitude(),
            };
            assert!((measured - star.orbital_radius).abs() < 1e-9);
            assert!(
                star.orbital_radius >= inner - 1e-9 && star.orbital_radius <= outer + 1e-9,
                "{:?} at {}",
                star.zone,
                star.orbital_radius
            );
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = generate(small_config(500), 99);
        let b = generate(small_config(500), 99);
        for (x, y) in a.stars.iter().zip(b.stars.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.stellar_type, y.stellar_type);
        }
        let c = generate(small_config(500), 100);
        assert!(a.stars.iter().zip(c.stars.iter()).any(|(x, y)| x.position != y.position));
    }

    #[test]
    fn test_frequencies_clamped_to_range() {
        let config = GalaxyConfig {
            frequency_range: (20.0, 2000.0),
            ..small_config(3000)
        };
        let field = generate(config, 8);
        let spectrum = field.frequency_spectrum();
        assert_eq!(spectrum.len(), 3000);
        for line in spectrum {
            assert!((20.0..=2000.0).contains(&line.frequency));
            assert!((0.0..=1.0).contains(&line.amplitude));
        }
    }

    #[test]
    fn test_frequency_falls_with_radius() {
        let generator = StarfieldGenerator::new(small_config(1)).unwrap();
        let inner = generator.frequencies.frequency(1.0, 5.0);
        let outer = generator.frequencies.frequency(1.0, 120.0);
        assert!(inner > outer);
    }

    #[test]
    fn test_disabled_features_leave_fields_empty() {
        let config = GalaxyConfig {
            enable_gravitational_waves: false,
            enable_orbital_resonance: false,
            enable_dark_matter: false,
            ..small_config(200)
        };
        let field = generate(config, 4);
        assert!(field.stars.iter().all(|s| s.gravitational_wave_frequency.is_none()));
        assert!(field.stars.iter().all(|s| s.resonance_harmonic.is_none()));
        assert!(field.frequency_spectrum().is_empty());
        assert!(field.resonance_groups().is_empty());
        assert!(field.dark_matter.nodes.is_empty());
    }

    #[test]
    fn test_resonance_groups_partition_stars() {
        let field = generate(small_config(4000), 12);
        let groups = field.resonance_groups();
        let harmonics: Vec<u32> = groups.iter().map(|g| g.harmonic).collect();
        assert_eq!(harmonics, field.config.resonance_harmonics);

        let members: usize = groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(members, 4000);
        for group in &groups {
            for &i in &group.members {
                assert_eq!(field.stars[i].resonance_harmonic, Some(group.harmonic));
            }
        }
    }

    #[test]
    fn test_type_properties() {
        let field = generate(small_config(5000), 31);
        for star in &field.stars {
            assert!(star.mass >= MIN_STAR_MASS && star.mass <= MAX_STAR_MASS);
            match star.stellar_type {
                StellarType::MainSequence => {
                    assert!((star.luminosity - star.mass.powf(3.5)).abs() < 1e-9 * star.luminosity.max(1.0))
                }
                StellarType::BlackHole => {
                    assert_eq!(star.luminosity, 0.0);
                    assert_eq!(star.size, 0.2);
                }
                StellarType::WhiteDwarf => assert!(star.mass <= 1.4),
                _ => {}
            }
        }
        // Compact objects are over-represented in the core relative to the halo
        let compact_share = |zone: GravitationalZone| {
            let total = field.stars_in_zone(zone).count() as f64;
            let compact = field
                .stars_in_zone(zone)
                .filter(|s| matches!(s.stellar_type, StellarType::NeutronStar | StellarType::BlackHole))
                .count() as f64;
            compact / total
        };
        assert!(compact_share(GravitationalZone::Core) > compact_share(GravitationalZone::Halo));
    }

    #[test]
    fn test_limit_configs_stay_finite() {
        use crate::buffers::to_buffers;

        for (tightness, central_mass) in [(100.0, 1.0e12), (-100.0, 1.0)] {
            let config = GalaxyConfig {
                galaxy_radius: 1.0e9,
                spiral_tightness: tightness,
                arm_spread: TAU,
                disk_thickness: 1.0,
                central_mass,
                star_count: 400,
                dark_matter_density: 1.0e6,
                oscillation_amplitude: 1.0e6,
                frequency_range: (1.0e-3, 1.0e6),
                ..small_config(400)
            };
            let mut field = generate(config, 12);
            field.dark_matter.tick(7.5).unwrap();

            for buffers in [to_buffers(&field.stars), to_buffers(&field.dark_matter.nodes)] {
                assert!(buffers.positions.iter().all(|v| v.is_finite()));
                assert!(buffers.colors.iter().all(|v| v.is_finite()));
                assert!(buffers.sizes.iter().all(|v| v.is_finite()));
            }
            for line in field.frequency_spectrum() {
                assert!((1.0e-3..=1.0e6).contains(&line.frequency), "{}", line.frequency);
                assert!(line.amplitude.is_finite());
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GalaxyConfig {
            galaxy_radius: -1.0,
            ..GalaxyConfig::default()
        };
        assert_eq!(
            StarfieldGenerator::new(config).err().and_then(|e| e.field()),
            Some("galaxy_radius")
        );
    }
}

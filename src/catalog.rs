// Static body catalog - J2000 mean elements and physical data
// Sources: JPL approximate planetary elements, NASA planetary fact sheets

use crate::error::{EngineError, EngineResult};
use crate::orbit::{MoonOrbitalElements, OrbitalElements, PhysicalAttributes};

#[allow(clippy::too_many_arguments)]
fn planet(
    name: &str,
    semi_major_axis: f64,
    eccentricity: f64,
    orbital_period: f64,
    inclination: f64,
    longitude_ascending_node: f64,
    argument_perihelion: f64,
    physical: PhysicalAttributes,
) -> OrbitalElements {
    OrbitalElements {
        name: name.to_string(),
        semi_major_axis,
        eccentricity,
        orbital_period,
        inclination,
        longitude_ascending_node,
        argument_perihelion,
        physical,
    }
}

#[allow(clippy::too_many_arguments)]
fn moon(
    name: &str,
    parent: &str,
    semi_major_axis_km: f64,
    eccentricity: f64,
    orbital_period: f64,
    inclination: f64,
    radius: f64,
    color: u32,
) -> MoonOrbitalElements {
    MoonOrbitalElements {
        name: name.to_string(),
        parent: parent.to_string(),
        semi_major_axis: semi_major_axis_km,
        eccentricity,
        orbital_period,
        inclination,
        longitude_ascending_node: 0.0,
        argument_perihelion: 0.0,
        radius,
        color,
    }
}

/// The eight planets, innermost first
pub fn planets() -> Vec<OrbitalElements> {
    vec![
        planet(
            "Mercury", 0.38709927, 0.20563593, 87.969, 7.00497902, 48.33076593, 29.12703035,
            PhysicalAttributes {
                radius: 2439.7,
                mass: 0.0553,
                rotation_period: 1407.6,
                axial_tilt: 0.034,
                color: 0x8c7853,
                has_rings: false,
                moon_count: 0,
            },
        ),
        planet(
            "Venus", 0.72333566, 0.00677672, 224.701, 3.39467605, 76.67984255, 54.92262463,
            PhysicalAttributes {
                radius: 6051.8,
                mass: 0.815,
                rotation_period: -5832.5,
                axial_tilt: 177.4,
                color: 0xffc649,
                has_rings: false,
                moon_count: 0,
            },
        ),
        planet(
            "Earth", 1.00000261, 0.01671123, 365.256, 0.0, 0.0, 102.93768193,
            PhysicalAttributes {
                radius: 6371.0,
                mass: 1.0,
                rotation_period: 23.9345,
                axial_tilt: 23.44,
                color: 0x6b93d6,
                has_rings: false,
                moon_count: 1,
            },
        ),
        planet(
            "Mars", 1.52371034, 0.09339410, 686.980, 1.84969142, 49.55953891, 286.4968315,
            PhysicalAttributes {
                radius: 3389.5,
                mass: 0.107,
                rotation_period: 24.6229,
                axial_tilt: 25.19,
                color: 0xc1440e,
                has_rings: false,
                moon_count: 2,
            },
        ),
        planet(
            "Jupiter", 5.20288700, 0.04838624, 4332.589, 1.30439695, 100.47390909, 274.25457074,
            PhysicalAttributes {
                radius: 69911.0,
                mass: 317.8,
                rotation_period: 9.925,
                axial_tilt: 3.13,
                color: 0xd8ca9d,
                has_rings: false,
                moon_count: 95,
            },
        ),
        planet(
            "Saturn", 9.53667594, 0.05386179, 10759.22, 2.48599187, 113.66242448, 338.93645383,
            PhysicalAttributes {
                radius: 58232.0,
                mass: 95.2,
                rotation_period: 10.656,
                axial_tilt: 26.73,
                color: 0xfad5a5,
                has_rings: true,
                moon_count: 146,
            },
        ),
        planet(
            "Uranus", 19.18916464, 0.04725744, 30685.4, 0.77263783, 74.01692503, 96.93735127,
            PhysicalAttributes {
                radius: 25362.0,
                mass: 14.5,
                rotation_period: -17.24,
                axial_tilt: 97.77,
                color: 0x4fd0e7,
                has_rings: true,
                moon_count: 28,
            },
        ),
        planet(
            "Neptune", 30.06992276, 0.00859048, 60189.0, 1.77004347, 131.78422574, 273.18053653,
            PhysicalAttributes {
                radius: 24622.0,
                mass: 17.1,
                rotation_period: 16.11,
                axial_tilt: 28.32,
                color: 0x4b70dd,
                has_rings: true,
                moon_count: 16,
            },
        ),
    ]
}

/// Major moons. Inclinations are taken against the ecliptic.
pub fn moons() -> Vec<MoonOrbitalElements> {
    vec![
        moon("Moon", "Earth", 384_400.0, 0.0549, 27.3217, 5.145, 1737.4, 0xaaaaaa),
        moon("Phobos", "Mars", 9_376.0, 0.0151, 0.31891, 1.093, 11.27, 0x8b7d6b),
        moon("Deimos", "Mars", 23_463.2, 0.00033, 1.26244, 0.93, 6.2, 0x9c8e7e),
        moon("Io", "Jupiter", 421_700.0, 0.0041, 1.769138, 0.05, 1821.6, 0xe8d44d),
        moon("Europa", "Jupiter", 671_034.0, 0.009, 3.551181, 0.47, 1560.8, 0xc9b99a),
        moon("Ganymede", "Jupiter", 1_070_412.0, 0.0013, 7.154553, 0.2, 2634.1, 0x8f8577),
        moon("Callisto", "Jupiter", 1_882_709.0, 0.0074, 16.689018, 0.192, 2410.3, 0x5e5449),
        moon("Titan", "Saturn", 1_221_870.0, 0.0288, 15.945, 0.34854, 2574.7, 0xe3a857),
        moon("Titania", "Uranus", 435_910.0, 0.0011, 8.706234, 0.34, 788.4, 0xb0a89c),
        moon("Triton", "Neptune", 354_759.0, 0.000016, 5.876854, 156.885, 1353.4, 0xd6c7bb),
    ]
}

/// Planet by case-insensitive name
pub fn find_planet(name: &str) -> EngineResult<OrbitalElements> {
    planets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EngineError::UnknownBody(name.to_string()))
}

pub fn moons_of(parent: &str) -> Vec<MoonOrbitalElements> {
    moons()
        .into_iter()
        .filter(|m| m.parent.eq_ignore_ascii_case(parent))
        .collect()
}

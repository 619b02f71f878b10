// Math primitives shared by the orbital and galaxy pipelines
// Scene convention: y-up, galactic/orbital reference plane is XZ

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

// =============================================================================
// 3D VECTOR MATHEMATICS
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance from the y axis (radius within the XZ plane)
    pub fn planar_magnitude(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn add(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Ecliptic (z = north) to scene (y-up) axes
    pub fn ecliptic_to_scene(&self) -> Vector3 {
        Vector3 {
            x: self.x,
            y: self.z,
            z: -self.y,
        }
    }

    pub fn to_f32_array(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// =============================================================================
// COLOR
// =============================================================================

/// Linear RGB, each channel in 0..=1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a 0xRRGGBB literal
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

// =============================================================================
// ANGLES & SAMPLING HELPERS
// =============================================================================

/// Normalize angle to [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Uniform point on a sphere of the given radius
pub fn point_on_sphere<R: rand::Rng + ?Sized>(rng: &mut R, radius: f64) -> Vector3 {
    let theta = rng.gen::<f64>() * TAU;
    let cos_phi = rng.gen::<f64>() * 2.0 - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();

    Vector3::new(
        radius * sin_phi * theta.cos(),
        radius * cos_phi,
        radius * sin_phi * theta.sin(),
    )
}

/// Radius distributed uniformly by volume within a spherical shell
pub fn radius_in_shell<R: rand::Rng + ?Sized>(rng: &mut R, inner: f64, outer: f64) -> f64 {
    let u: f64 = rng.gen();
    let inner3 = inner.powi(3);
    let outer3 = outer.powi(3);
    (inner3 + u * (outer3 - inner3)).cbrt().clamp(inner, outer)
}

/// Signed cubic jitter in [-1, 1], concentrated around zero
pub fn clustered_jitter<R: rand::Rng + ?Sized>(rng: &mut R) -> f64 {
    let magnitude = rng.gen::<f64>().powi(3);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

pub const DEG_TO_RAD: f64 = PI / 180.0;

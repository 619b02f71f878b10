// Buffer Exporter - flat f32 arrays for the renderer
// Index i maps to positions/colors [3i, 3i+1, 3i+2] and sizes [i]

use serde::{Deserialize, Serialize};

use crate::dark_matter::DarkMatterNode;
use crate::math::{Color, Vector3};
use crate::starfield::StarRecord;

/// Anything the point renderer can draw
pub trait Renderable {
    fn position(&self) -> Vector3;
    fn color(&self) -> Color;
    fn size(&self) -> f32;
}

impl Renderable for StarRecord {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn color(&self) -> Color {
        self.color
    }

    fn size(&self) -> f32 {
        self.size as f32
    }
}

const DARK_MATTER_DIM: Color = Color::new(0.25, 0.05, 0.45);
const DARK_MATTER_BRIGHT: Color = Color::new(0.75, 0.35, 1.0);

impl Renderable for DarkMatterNode {
    fn position(&self) -> Vector3 {
        self.position
    }

    /// Brightens with current density
    fn color(&self) -> Color {
        DARK_MATTER_DIM.lerp(&DARK_MATTER_BRIGHT, self.density as f32)
    }

    fn size(&self) -> f32 {
        self.influence_radius as f32
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RenderBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
}

impl RenderBuffers {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Flatten in input order, no recomputation
pub fn to_buffers<T: Renderable>(items: &[T]) -> RenderBuffers {
    let mut buffers = RenderBuffers {
        positions: Vec::with_capacity(items.len() * 3),
        colors: Vec::with_capacity(items.len() * 3),
        sizes: Vec::with_capacity(items.len()),
    };

    for item in items {
        buffers.positions.extend_from_slice(&item.position().to_f32_array());
        buffers.colors.extend_from_slice(&item.color().to_array());
        buffers.sizes.push(item.size());
    }

    buffers
}

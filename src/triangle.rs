use glam::Vec3;

use crate::gpu;

/// Host-side triangle with its material values already baked in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangle {
    positions: [Vec3; 3],
    color: Vec3,
    intensity: Vec3,
}

impl Triangle {
    pub fn new(positions: [impl Into<Vec3>; 3]) -> Self {
        Self {
            positions: positions.map(Into::into),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: Vec3) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.positions
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn intensity(&self) -> Vec3 {
        self.intensity
    }

    pub(crate) fn serialize(&self) -> gpu::Triangle {
        gpu::Triangle::new(self.positions, self.color, self.intensity)
    }
}

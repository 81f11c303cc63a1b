use glam::Vec3;

/// Material entry built while scanning a material library.
///
/// Materials only live through scene loading; once every face has resolved
/// its `usemtl` binding, the values are copied into the triangles and the
/// materials are dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    name: String,
    color: Vec3,
    intensity: Vec3,
}

impl Material {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn intensity(&self) -> Vec3 {
        self.intensity
    }

    pub(crate) fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    pub(crate) fn set_intensity(&mut self, intensity: Vec3) {
        self.intensity = intensity;
    }
}

use glam::Vec3;

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;

/// A primitive shape paired with its own material.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,

    pub visible: bool,

    /// Radians per second added to the owning node's XYZ Euler angles.
    pub spin: Option<Vec3>,
    /// Accumulated Euler angles driven by `spin`
    pub(crate) spin_angles: Vec3,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            visible: true,
            spin: None,
            spin_angles: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = Some(spin);
        self
    }

    #[inline]
    #[must_use]
    pub fn spin_angles(&self) -> Vec3 {
        self.spin_angles
    }

    /// Adds `spin * dt` to the accumulated angles; `None` without a spin.
    pub(crate) fn advance_spin(&mut self, dt: f32) -> Option<Vec3> {
        let spin = self.spin?;
        self.spin_angles += spin * dt;
        Some(self.spin_angles)
    }
}

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Uniform block of the water shader.
///
/// std140-friendly: every vector is padded to 16 bytes and the scalars are
/// packed into the trailing `w` slots.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct WaterUniforms {
    /// xyz = light direction, w = distortion scale
    pub light_direction: [f32; 4],
    /// xyz = light color, w = elapsed time (seconds, scaled by rate)
    pub light_color: [f32; 4],
    /// xyz = surface color, w = fog flag (0.0 / 1.0)
    pub surface_color: [f32; 4],
    /// x = reflection texture width, y = height, z/w unused
    pub texture_size: [f32; 4],
}

impl WaterUniforms {
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.light_color[3]
    }

    #[inline]
    pub fn set_time(&mut self, time: f32) {
        self.light_color[3] = time;
    }

    #[inline]
    #[must_use]
    pub fn light_direction(&self) -> Vec3 {
        Vec3::from_slice(&self.light_direction[..3])
    }

    #[inline]
    #[must_use]
    pub fn distortion_scale(&self) -> f32 {
        self.light_direction[3]
    }

    #[inline]
    #[must_use]
    pub fn fog_enabled(&self) -> bool {
        self.surface_color[3] > 0.5
    }
}

impl Default for WaterUniforms {
    fn default() -> Self {
        Self {
            light_direction: [0.0, 0.0, 0.0, 3.7],
            light_color: [1.0, 1.0, 1.0, 0.0],
            surface_color: [0.0, 0.0, 0.0, 1.0],
            texture_size: [512.0, 512.0, 0.0, 0.0],
        }
    }
}

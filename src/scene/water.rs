//! Animated water surface.
//!
//! A large flat plane shaded by a scrolling normal map. The only state that
//! changes after construction is the shader's `time` uniform.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::resources::color::Color;
use crate::resources::geometry::Geometry;
use crate::resources::texture::Texture;
use crate::resources::uniform_slot::UniformSlot;
use crate::resources::uniforms::WaterUniforms;

/// Static parameters of an [`AnimatedSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Edge length of the square plane
    pub size: f32,
    pub texture_width: u32,
    pub texture_height: u32,
    pub light_direction: Vec3,
    pub light_color: Color,
    pub surface_color: Color,
    pub distortion_scale: f32,
    pub fog: bool,
    /// Scales frame deltas before they reach the `time` uniform
    pub rate: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            size: 10_000.0,
            texture_width: 512,
            texture_height: 512,
            light_direction: Vec3::ZERO,
            light_color: Color::from_hex(0xAA_AAAA),
            surface_color: Color::from_hex(0x00_1020),
            distortion_scale: 3.7,
            fog: true,
            rate: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct AnimatedSurface {
    geometry: Geometry,
    normal_map: Arc<Texture>,
    config: WaterConfig,
    uniforms: UniformSlot<WaterUniforms>,
    time: f32,
}

impl AnimatedSurface {
    /// A negative or non-finite `config.rate` is clamped to `0.0`, which
    /// freezes the animation instead of running it backwards.
    #[must_use]
    pub fn new(mut config: WaterConfig, normal_map: Arc<Texture>) -> Self {
        if !(config.rate.is_finite() && config.rate >= 0.0) {
            log::warn!("Water rate {} is not a non-negative number; using 0.0", config.rate);
            config.rate = 0.0;
        }

        let light_dir = config.light_direction;
        let light_color = config.light_color.to_vec3();
        let surface_color = config.surface_color.to_vec3();

        let uniforms = WaterUniforms {
            light_direction: [light_dir.x, light_dir.y, light_dir.z, config.distortion_scale],
            light_color: [light_color.x, light_color.y, light_color.z, 0.0],
            surface_color: [
                surface_color.x,
                surface_color.y,
                surface_color.z,
                if config.fog { 1.0 } else { 0.0 },
            ],
            texture_size: [config.texture_width as f32, config.texture_height as f32, 0.0, 0.0],
        };

        Self {
            geometry: Geometry::plane(config.size, config.size),
            normal_map,
            uniforms: UniformSlot::new(uniforms, "Water Uniforms"),
            config,
            time: 0.0,
        }
    }

    /// Moves the surface animation forward by `delta_seconds * rate`.
    ///
    /// Negative or non-finite deltas are ignored, so `time` never decreases.
    pub fn advance(&mut self, delta_seconds: f32) {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            log::debug!("Ignoring water delta {delta_seconds}");
            return;
        }

        self.time += delta_seconds * self.config.rate;
        self.uniforms.set_time(self.time);
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.config.rate
    }

    #[must_use]
    pub fn config(&self) -> &WaterConfig {
        &self.config
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn normal_map(&self) -> &Arc<Texture> {
        &self.normal_map
    }

    #[must_use]
    pub fn uniforms(&self) -> &UniformSlot<WaterUniforms> {
        &self.uniforms
    }
}

use serde::{Deserialize, Serialize};

use crate::resources::color::Color;

/// How a material's alpha is interpreted, mirroring glTF's `alphaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

// ============================================================================
// Material
// ============================================================================

/// Physically based shading parameters attached to a renderable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,

    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub alpha_mode: AlphaMode,

    pub emissive: Color,
    pub emissive_intensity: f32,

    pub roughness: f32,
    pub metalness: f32,

    /// Index of refraction
    pub ior: f32,
    /// 0.0 = opaque body, 1.0 = fully transmissive
    pub transmission: f32,
    pub thickness: f32,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            alpha_mode: AlphaMode::Opaque,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            ior: 1.5,
            transmission: 0.0,
            thickness: 0.0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[must_use]
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    /// Emission actually contributed by the surface.
    #[must_use]
    pub fn emitted_radiance(&self) -> glam::Vec3 {
        self.emissive.to_vec3() * self.emissive_intensity
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// A sparse set of material field assignments.
///
/// Only the fields that are `Some` are written; everything else on the
/// target material keeps its loaded value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialOverrides {
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub emissive: Option<Color>,
    pub emissive_intensity: Option<f32>,
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub ior: Option<f32>,
    pub transmission: Option<f32>,
    pub thickness: Option<f32>,
}

impl MaterialOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Glass-like window preset: warm faint glow, white, fully transmissive,
    /// perfectly smooth dielectric with IOR 1.5.
    #[must_use]
    pub fn glass() -> Self {
        Self {
            color: Some(Color::WHITE),
            opacity: None,
            transparent: Some(true),
            emissive: Some(Color::from_hex(0xFF_A500)),
            emissive_intensity: Some(0.1),
            roughness: Some(0.0),
            metalness: Some(0.0),
            ior: Some(1.5),
            transmission: Some(1.0),
            thickness: Some(0.1),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = Some(emissive);
        self.emissive_intensity = Some(intensity);
        self
    }

    #[must_use]
    pub fn with_emissive_intensity(mut self, intensity: f32) -> Self {
        self.emissive_intensity = Some(intensity);
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = Some(roughness);
        self
    }

    #[must_use]
    pub fn with_transmission(mut self, transmission: f32) -> Self {
        self.transmission = Some(transmission);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes every present field onto `material`.
    pub fn apply_to(&self, material: &mut Material) {
        macro_rules! assign {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field { material.$field = value; })*
            };
        }
        assign!(
            color,
            opacity,
            transparent,
            emissive,
            emissive_intensity,
            roughness,
            metalness,
            ior,
            transmission,
            thickness,
        );
    }
}

//! Declarative scene descriptions.
//!
//! Every part derives serde with `#[serde(default)]`, so a JSON scene only
//! needs the fields it changes.

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::resources::color::Color;
use crate::resources::geometry::Geometry;
use crate::resources::material::MaterialOverrides;
use crate::scene::directed_light::DirectedLightConfig;
use crate::scene::transform::Transform;
use crate::scene::water::WaterConfig;
use crate::tuning::ShadowFlags;

// ============================================================================
// Parts
// ============================================================================

/// Position, XYZ Euler rotation (radians) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformSpec {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn apply(&self, transform: &mut Transform) {
        transform.position = self.position;
        transform.set_rotation_euler(self.rotation.x, self.rotation.y, self.rotation.z);
        transform.scale = self.scale;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSpec {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightSpec {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLightSpec {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightSpec {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// 0 = unbounded
    pub distance: f32,
    pub cast_shadows: bool,
}

impl Default for PointLightSpec {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::ZERO,
            distance: 0.0,
            cast_shadows: false,
        }
    }
}

/// Shines from `position` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSpec {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadows: bool,
}

impl Default for DirectionalLightSpec {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::Y,
            cast_shadows: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightSpec {
    Ambient(AmbientLightSpec),
    Point(PointLightSpec),
    Directional(DirectionalLightSpec),
    Spot(DirectedLightConfig),
}

/// A model loaded through the asset cache and prepared once on arrival.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    pub url: String,
    pub transform: TransformSpec,
    /// Material name to overrides, applied once when the model is first loaded
    pub material_overrides: BTreeMap<String, MaterialOverrides>,
    pub shadows: ShadowFlags,
}

impl ModelSpec {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_override(mut self, material: impl Into<String>, overrides: MaterialOverrides) -> Self {
        self.material_overrides.insert(material.into(), overrides);
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, shadows: ShadowFlags) -> Self {
        self.shadows = shadows;
        self
    }

    /// Cache label of this model's preparation: empty when nothing is tuned,
    /// otherwise the serialized overrides and shadow flags. Models that share
    /// a URL share one cached instance only when their labels match.
    pub fn tuning_label(&self) -> Result<String> {
        if self.material_overrides.is_empty() && self.shadows.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_json::to_string(&(&self.material_overrides, self.shadows))?)
    }
}

/// An analytic primitive with a single-colored standard material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSpec {
    pub name: String,
    pub geometry: Geometry,
    pub color: Color,
    pub transform: TransformSpec,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    /// Radians per second added to the XYZ Euler angles
    pub spin: Option<Vec3>,
}

impl Default for MeshSpec {
    fn default() -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry: Geometry::default(),
            color: Color::WHITE,
            transform: TransformSpec::default(),
            cast_shadows: false,
            receive_shadows: false,
            spin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSpec {
    /// Normal map URL, sampled with repeat wrapping
    pub normal_map: String,
    #[serde(flatten)]
    pub config: WaterConfig,
    pub transform: TransformSpec,
}

impl Default for WaterSpec {
    fn default() -> Self {
        Self {
            normal_map: "textures/waternormals.jpg".to_string(),
            config: WaterConfig::default(),
            // Lay the XY plane flat
            transform: TransformSpec::default().with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSpec {
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsSpec {
    fn default() -> Self {
        Self {
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,
        }
    }
}

// ============================================================================
// SceneSpec
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSpec {
    pub name: String,
    pub camera: CameraSpec,
    pub background: Option<Color>,
    pub lights: Vec<LightSpec>,
    pub models: Vec<ModelSpec>,
    pub meshes: Vec<MeshSpec>,
    pub water: Option<WaterSpec>,
    pub controls: Option<ControlsSpec>,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            name: "scene".to_string(),
            camera: CameraSpec::default(),
            background: None,
            lights: Vec::new(),
            models: Vec::new(),
            meshes: Vec::new(),
            water: None,
            controls: Some(ControlsSpec::default()),
        }
    }
}

impl SceneSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects descriptions that cannot be composed.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidScene(msg));

        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return invalid(format!("camera fov must be in (0, 180) degrees, got {}", cam.fov));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                cam.near, cam.far
            ));
        }

        for light in &self.lights {
            if let LightSpec::Spot(config) = light
                && let Some(radius) = config.orbit_radius
                && !(radius.is_finite() && radius > 0.0)
            {
                return invalid(format!("light orbit radius must be positive, got {radius}"));
            }
        }

        for model in &self.models {
            if model.url.trim().is_empty() {
                return invalid("model without url".to_string());
            }
        }

        for mesh in &self.meshes {
            if let Some(spin) = mesh.spin
                && !spin.is_finite()
            {
                return invalid(format!("mesh '{}' has a non-finite spin rate", mesh.name));
            }
        }

        if let Some(water) = &self.water {
            if water.normal_map.trim().is_empty() {
                return invalid("water without normal map".to_string());
            }
            if !(water.config.rate.is_finite() && water.config.rate >= 0.0) {
                return invalid(format!("water rate must be finite and >= 0, got {}", water.config.rate));
            }
            if !(water.config.size > 0.0) {
                return invalid(format!("water size must be positive, got {}", water.config.size));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// The lights shared by the box and house demos.
    fn studio_lights() -> Vec<LightSpec> {
        vec![
            LightSpec::Ambient(AmbientLightSpec {
                color: Color::WHITE,
                intensity: 0.2,
            }),
            LightSpec::Point(PointLightSpec {
                position: Vec3::new(10.0, 10.0, 10.0),
                ..PointLightSpec::default()
            }),
            LightSpec::Directional(DirectionalLightSpec {
                position: Vec3::new(2.0, 3.0, 1.0),
                intensity: 1.5,
                ..DirectionalLightSpec::default()
            }),
        ]
    }

    /// A tomato-colored unit cube spinning on X and Y.
    #[must_use]
    pub fn rotating_box() -> Self {
        Self {
            name: "rotating_box".to_string(),
            lights: Self::studio_lights(),
            meshes: vec![MeshSpec {
                name: "RotatingBox".to_string(),
                color: Color::from_hex(0xFF_6347),
                spin: Some(Vec3::new(1.0, 1.0, 0.0)),
                ..MeshSpec::default()
            }],
            ..Self::default()
        }
    }

    /// `models/house.glb` with its `window` material turned to glass.
    #[must_use]
    pub fn house() -> Self {
        Self {
            name: "house".to_string(),
            lights: Self::studio_lights(),
            models: vec![
                ModelSpec::new("models/house.glb")
                    .with_override("window", MaterialOverrides::glass())
                    .with_shadows(ShadowFlags::both()),
            ],
            ..Self::default()
        }
    }

    /// A shadow-casting spot light over a gray floor and a red box.
    #[must_use]
    pub fn spotlight_bench() -> Self {
        Self {
            name: "spotlight_bench".to_string(),
            camera: CameraSpec {
                position: Vec3::new(10.0, 10.0, 10.0),
                ..CameraSpec::default()
            },
            lights: vec![LightSpec::Spot(DirectedLightConfig {
                color: Color::WHITE,
                intensity: 5.0,
                distance: 50.0,
                angle: FRAC_PI_6,
                penumbra: 0.3,
                position: Vec3::new(5.0, 10.0, 5.0),
                target: Vec3::ZERO,
                cast_shadows: true,
                ..DirectedLightConfig::default()
            })],
            meshes: vec![
                MeshSpec {
                    name: "Floor".to_string(),
                    geometry: Geometry::plane(50.0, 50.0),
                    color: Color::from_hex(0x80_8080),
                    transform: TransformSpec::default().with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
                    receive_shadows: true,
                    ..MeshSpec::default()
                },
                MeshSpec {
                    name: "TestBox".to_string(),
                    geometry: Geometry::cube(2.0),
                    color: Color::from_hex(0xFF_0000),
                    transform: TransformSpec::at(Vec3::new(0.0, 2.0, 0.0)),
                    cast_shadows: true,
                    ..MeshSpec::default()
                },
            ],
            ..Self::default()
        }
    }

    /// Night-time island: lighthouse beam sweeping over an animated ocean.
    #[must_use]
    pub fn island() -> Self {
        Self {
            name: "island".to_string(),
            camera: CameraSpec {
                position: Vec3::new(0.0, 10.0, 40.0),
                far: 20_000.0,
                ..CameraSpec::default()
            },
            background: Some(Color::from_hex(0x00_0510)),
            lights: vec![
                LightSpec::Ambient(AmbientLightSpec {
                    color: Color::from_hex(0x33_4466),
                    intensity: 0.1,
                }),
                LightSpec::Spot(DirectedLightConfig {
                    color: Color::from_hex(0xFF_FBE6),
                    intensity: 1000.0,
                    distance: 500.0,
                    angle: 10.0,
                    penumbra: 1.0,
                    attenuation: 5.0,
                    angle_power: 8.0,
                    position: Vec3::new(-8.5, 8.5, -5.0),
                    target: Vec3::new(10.0, 0.0, 0.0),
                    orbit_radius: Some(50.0),
                    cast_shadows: true,
                }),
            ],
            models: vec![ModelSpec::new("models/island.glb").with_shadows(ShadowFlags::both())],
            water: Some(WaterSpec {
                config: WaterConfig {
                    rate: 0.1,
                    ..WaterConfig::default()
                },
                ..WaterSpec::default()
            }),
            ..Self::default()
        }
    }

    /// Looks a preset up by name.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "rotating_box" => Some(Self::rotating_box()),
            "house" => Some(Self::house()),
            "spotlight_bench" => Some(Self::spotlight_bench()),
            "island" => Some(Self::island()),
            _ => None,
        }
    }

    pub const PRESETS: &'static [&'static str] = &["rotating_box", "house", "spotlight_bench", "island"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in SceneSpec::PRESETS {
            let spec = SceneSpec::preset(name).unwrap();
            spec.validate().unwrap();
            assert_eq!(spec.name, *name);
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let spec = SceneSpec::from_json_str(
            r#"{
                "lights": [{ "type": "ambient", "intensity": 0.2 }],
                "water": { "rate": 0.2 }
            }"#,
        )
        .unwrap();

        assert_eq!(spec.camera, CameraSpec::default());
        assert!(matches!(spec.lights[0], LightSpec::Ambient(a) if (a.intensity - 0.2).abs() < 1e-6));
        let water = spec.water.unwrap();
        assert!((water.config.rate - 0.2).abs() < 1e-6);
        assert_eq!(water.normal_map, "textures/waternormals.jpg");
        assert_eq!(water.config.texture_width, 512);
    }

    #[test]
    fn json_round_trips_a_preset() {
        let spec = SceneSpec::island();
        let json = spec.to_json_string().unwrap();
        assert_eq!(SceneSpec::from_json_str(&json).unwrap(), spec);
    }

    #[test]
    fn rejects_bad_camera() {
        let err = SceneSpec::from_json_str(r#"{ "camera": { "near": 10.0, "far": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidScene(_)));
    }

    #[test]
    fn overrides_reject_unknown_fields() {
        let json = r#"{ "models": [{ "url": "a.glb", "material_overrides": { "window": { "glow": 1.0 } } }] }"#;
        assert!(matches!(SceneSpec::from_json_str(json), Err(Error::Json(_))));
    }
}

use glam::Vec3;
use uuid::Uuid;

use crate::scene::NodeKey;

#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub bias: f32,
    pub normal_bias: f32,
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.005,
            normal_bias: 0.02,
            map_size: 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {}

#[derive(Debug, Clone)]
pub struct PointLight {
    /// 0 = unbounded
    pub range: f32,
}

#[derive(Debug, Clone)]
pub struct SpotLight {
    /// 0 = unbounded
    pub range: f32,
    /// Outer cone half-angle in radians
    pub angle: f32,
    /// 0..1, fraction of the cone that fades out
    pub penumbra: f32,
    /// Volumetric beam falloff along its length
    pub attenuation: f32,
    /// Volumetric beam falloff across its width
    pub angle_power: f32,
    /// Orientation target. Must be attached to the same scene as the light.
    pub target: Option<NodeKey>,
}

impl SpotLight {
    #[inline]
    #[must_use]
    pub fn outer_cone(&self) -> f32 {
        self.angle
    }

    #[inline]
    #[must_use]
    pub fn inner_cone(&self) -> f32 {
        self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: Option<ShadowConfig>,
}

impl Light {
    fn with_kind(color: Vec3, intensity: f32, kind: LightKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind,
            cast_shadows: false,
            shadow: Some(ShadowConfig::default()),
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Directional(DirectionalLight {}))
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Point(PointLight { range }))
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, range: f32, angle: f32, penumbra: f32) -> Self {
        Self::with_kind(
            color,
            intensity,
            LightKind::Spot(SpotLight {
                range,
                angle,
                penumbra,
                attenuation: 5.0,
                angle_power: 5.0,
                target: None,
            }),
        )
    }

    #[must_use]
    pub fn as_spot(&self) -> Option<&SpotLight> {
        match &self.kind {
            LightKind::Spot(spot) => Some(spot),
            _ => None,
        }
    }

    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match &mut self.kind {
            LightKind::Spot(spot) => Some(spot),
            _ => None,
        }
    }
}

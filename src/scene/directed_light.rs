use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::resources::color::Color;
use crate::scene::light::Light;
use crate::scene::{NodeKey, Scene};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectedLightConfig {
    pub color: Color,
    pub intensity: f32,
    /// Cut-off distance, 0 = unbounded
    pub distance: f32,
    /// Cone half-angle in radians, clamped to `PI / 2`
    pub angle: f32,
    pub penumbra: f32,
    pub attenuation: f32,
    pub angle_power: f32,
    pub position: Vec3,
    /// Initial target position
    pub target: Vec3,
    /// Radius of the circular target path, `None` for a fixed target
    pub orbit_radius: Option<f32>,
    pub cast_shadows: bool,
}

impl Default for DirectedLightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            attenuation: 5.0,
            angle_power: 5.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
            orbit_radius: None,
            cast_shadows: false,
        }
    }
}

/// A spot light aimed at an explicit target node.
///
/// The target starts out detached: the light has no direction until
/// [`attach_target`](Self::attach_target) puts the target into the graph.
#[derive(Debug, Clone, Copy)]
pub struct DirectedLight {
    light_node: NodeKey,
    target_node: NodeKey,
    orbit_radius: Option<f32>,
}

impl DirectedLight {
    pub fn spawn(scene: &mut Scene, config: &DirectedLightConfig) -> Result<Self> {
        if let Some(radius) = config.orbit_radius
            && !(radius.is_finite() && radius > 0.0)
        {
            return Err(Error::InvalidScene(format!(
                "light orbit radius must be positive, got {radius}"
            )));
        }

        let target_node = scene.create_node("DirectedLight Target");
        if let Some(node) = scene.get_node_mut(target_node) {
            node.transform.position = config.target;
        }

        let angle = config.angle.clamp(0.0, FRAC_PI_2);
        let mut light = Light::new_spot(
            config.color.to_vec3(),
            config.intensity,
            config.distance,
            angle,
            config.penumbra,
        );
        light.cast_shadows = config.cast_shadows;
        if let Some(spot) = light.as_spot_mut() {
            spot.attenuation = config.attenuation;
            spot.angle_power = config.angle_power;
            spot.target = Some(target_node);
        }

        let light_node = scene.add_light(light);
        if let Some(node) = scene.get_node_mut(light_node) {
            node.name = "DirectedLight".to_string();
            node.transform.position = config.position;
            node.cast_shadows = config.cast_shadows;
        }

        Ok(Self {
            light_node,
            target_node,
            orbit_radius: config.orbit_radius,
        })
    }

    /// Adds the target to the scene root so the light orientation takes effect.
    pub fn attach_target(&self, scene: &mut Scene) {
        scene.attach_to_root(self.target_node);
    }

    #[must_use]
    pub fn is_target_attached(&self, scene: &Scene) -> bool {
        scene.is_attached(self.target_node)
    }

    /// World-space direction from the light to its target.
    #[must_use]
    pub fn direction(&self, scene: &Scene) -> Option<Vec3> {
        scene.light_direction(self.light_node)
    }

    /// Places the target on its orbit for `elapsed_seconds`. No-op for fixed
    /// targets.
    pub fn advance(&self, scene: &mut Scene, elapsed_seconds: f32) {
        let Some(radius) = self.orbit_radius else {
            return;
        };
        if let Some(node) = scene.get_node_mut(self.target_node) {
            node.transform.position = orbit_point(radius, elapsed_seconds);
        }
    }

    #[inline]
    #[must_use]
    pub fn light_node(&self) -> NodeKey {
        self.light_node
    }

    #[inline]
    #[must_use]
    pub fn target_node(&self) -> NodeKey {
        self.target_node
    }

    #[inline]
    #[must_use]
    pub fn orbit_radius(&self) -> Option<f32> {
        self.orbit_radius
    }
}

/// Point on the horizontal circle of `radius` at angle `t`: `(sin t, 0, cos t) * radius`.
#[inline]
#[must_use]
pub fn orbit_point(radius: f32, t: f32) -> Vec3 {
    let (sin, cos) = t.sin_cos();
    Vec3::new(sin * radius, 0.0, cos * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_stays_on_circle() {
        for i in 0..64 {
            let t = i as f32 * 0.37;
            let p = orbit_point(50.0, t);
            assert_eq!(p.y, 0.0);
            assert!((p.x * p.x + p.z * p.z - 2500.0).abs() < 1e-2);
        }
    }

    #[test]
    fn rejects_non_positive_radius() {
        let mut scene = Scene::new();
        let config = DirectedLightConfig {
            orbit_radius: Some(0.0),
            ..DirectedLightConfig::default()
        };
        assert!(matches!(
            DirectedLight::spawn(&mut scene, &config),
            Err(Error::InvalidScene(_))
        ));
        assert!(scene.nodes.is_empty());
    }

    #[test]
    fn angle_is_clamped_to_quarter_turn() {
        let mut scene = Scene::new();
        let config = DirectedLightConfig {
            angle: 10.0,
            ..DirectedLightConfig::default()
        };
        let light = DirectedLight::spawn(&mut scene, &config).unwrap();
        let spot = scene.light_of(light.light_node()).and_then(Light::as_spot).unwrap();
        assert!((spot.angle - FRAC_PI_2).abs() < 1e-6);
    }
}

//! Directed Light Tests
//!
//! Tests for:
//! - Spawning: light node at the root, target node detached
//! - Direction: none until the target is attached, then light -> target
//! - Orbit: target placement over time
//! - Config: defaults and JSON form

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use glam::Vec3;
use tidelight::errors::Error;
use tidelight::resources::Color;
use tidelight::scene::directed_light::{DirectedLight, DirectedLightConfig, orbit_point};
use tidelight::scene::light::Light;
use tidelight::scene::scene::Scene;

fn assert_vec3_near(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-4, "{a} != {b}");
}

fn bench_config() -> DirectedLightConfig {
    DirectedLightConfig {
        intensity: 5.0,
        distance: 50.0,
        angle: FRAC_PI_6,
        penumbra: 0.3,
        position: Vec3::new(5.0, 10.0, 5.0),
        target: Vec3::ZERO,
        cast_shadows: true,
        ..DirectedLightConfig::default()
    }
}

// ============================================================================
// Spawning & Target Attachment
// ============================================================================

#[test]
fn spawn_leaves_target_detached() {
    let mut scene = Scene::new();
    let light = DirectedLight::spawn(&mut scene, &bench_config()).unwrap();

    assert!(scene.is_attached(light.light_node()));
    assert!(!light.is_target_attached(&scene));
    assert_eq!(light.direction(&scene), None);
    assert_eq!(scene.get_node(light.target_node()).unwrap().name, "DirectedLight Target");
}

#[test]
fn attaching_target_gives_direction() {
    let mut scene = Scene::new();
    let light = DirectedLight::spawn(&mut scene, &bench_config()).unwrap();
    light.attach_target(&mut scene);
    scene.update_matrix_world();

    assert!(light.is_target_attached(&scene));
    let expected = (Vec3::ZERO - Vec3::new(5.0, 10.0, 5.0)).normalize();
    assert_vec3_near(light.direction(&scene).unwrap(), expected);
}

#[test]
fn detaching_target_again_drops_direction() {
    let mut scene = Scene::new();
    let light = DirectedLight::spawn(&mut scene, &bench_config()).unwrap();
    light.attach_target(&mut scene);
    scene.detach(light.target_node());

    assert_eq!(light.direction(&scene), None);
}

#[test]
fn spot_parameters_come_from_config() {
    let mut scene = Scene::new();
    let config = DirectedLightConfig {
        attenuation: 2.0,
        angle_power: 8.0,
        ..bench_config()
    };
    let light = DirectedLight::spawn(&mut scene, &config).unwrap();

    let spot_light = scene.light_of(light.light_node()).unwrap();
    assert!(spot_light.cast_shadows);
    assert!((spot_light.intensity - 5.0).abs() < 1e-6);

    let spot = spot_light.as_spot().unwrap();
    assert!((spot.angle - FRAC_PI_6).abs() < 1e-6);
    assert!((spot.penumbra - 0.3).abs() < 1e-6);
    assert!((spot.range - 50.0).abs() < 1e-6);
    assert!((spot.attenuation - 2.0).abs() < 1e-6);
    assert!((spot.angle_power - 8.0).abs() < 1e-6);
    assert_eq!(spot.target, Some(light.target_node()));
}

#[test]
fn oversized_angle_is_clamped() {
    let mut scene = Scene::new();
    let config = DirectedLightConfig {
        angle: 10.0,
        ..bench_config()
    };
    let light = DirectedLight::spawn(&mut scene, &config).unwrap();
    let spot = scene.light_of(light.light_node()).and_then(Light::as_spot).unwrap();
    assert!((spot.angle - FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn invalid_orbit_radius_is_rejected() {
    let mut scene = Scene::new();
    for radius in [0.0, -5.0, f32::NAN] {
        let config = DirectedLightConfig {
            orbit_radius: Some(radius),
            ..bench_config()
        };
        assert!(matches!(
            DirectedLight::spawn(&mut scene, &config),
            Err(Error::InvalidScene(_))
        ));
    }
    assert!(scene.nodes.is_empty());
}

// ============================================================================
// Orbit
// ============================================================================

#[test]
fn orbit_moves_target_on_circle() {
    let mut scene = Scene::new();
    let config = DirectedLightConfig {
        orbit_radius: Some(50.0),
        ..bench_config()
    };
    let light = DirectedLight::spawn(&mut scene, &config).unwrap();
    light.attach_target(&mut scene);

    light.advance(&mut scene, 0.0);
    assert_vec3_near(scene.world_position(light.target_node()).unwrap(), Vec3::new(0.0, 0.0, 50.0));

    light.advance(&mut scene, FRAC_PI_2);
    assert_vec3_near(scene.world_position(light.target_node()).unwrap(), Vec3::new(50.0, 0.0, 0.0));

    // The light itself stays put
    assert_vec3_near(scene.world_position(light.light_node()).unwrap(), Vec3::new(5.0, 10.0, 5.0));
}

#[test]
fn fixed_target_ignores_advance() {
    let mut scene = Scene::new();
    let light = DirectedLight::spawn(&mut scene, &bench_config()).unwrap();
    light.advance(&mut scene, 3.0);
    assert_vec3_near(scene.world_position(light.target_node()).unwrap(), Vec3::ZERO);
}

#[test]
fn orbit_point_formula() {
    assert_vec3_near(orbit_point(2.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    assert_vec3_near(orbit_point(2.0, std::f32::consts::PI), Vec3::new(0.0, 0.0, -2.0));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_json_uses_defaults() {
    let config: DirectedLightConfig =
        serde_json::from_str(r##"{ "color": "#fffbe6", "intensity": 1000, "orbit_radius": 50 }"##).unwrap();

    assert_eq!(config.color, Color::from_hex(0xFF_FBE6));
    assert_eq!(config.orbit_radius, Some(50.0));
    assert_eq!(config.position, Vec3::Y);
    assert!((config.attenuation - 5.0).abs() < 1e-6);
}

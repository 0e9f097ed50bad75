//! Frame Clock Tests
//!
//! Tests for:
//! - FrameClock: registration order, unregistering, frame state
//! - Water surfaces driven by the clock
//! - Timer: clamped wall-clock deltas

use std::sync::{Arc, Mutex};

use glam::Vec3;
use tidelight::clock::FrameClock;
use tidelight::resources::Texture;
use tidelight::scene::scene::Scene;
use tidelight::scene::water::{AnimatedSurface, WaterConfig};
use tidelight::utils::Timer;

fn normal_map() -> Arc<Texture> {
    Arc::new(Texture::new_rgba8("normals", 1, 1, vec![128, 128, 255, 255]))
}

// ============================================================================
// FrameClock
// ============================================================================

#[test]
fn callbacks_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut clock = FrameClock::new();
    let mut scene = Scene::new();

    for name in ["water", "light orbit", "mesh spin"] {
        let log = Arc::clone(&log);
        clock.register(name, move |_, state| {
            log.lock().unwrap().push((name, state.frame_count));
        });
    }

    clock.tick(&mut scene, 0.016);
    clock.tick(&mut scene, 0.016);

    assert_eq!(
        *log.lock().unwrap(),
        [
            ("water", 1),
            ("light orbit", 1),
            ("mesh spin", 1),
            ("water", 2),
            ("light orbit", 2),
            ("mesh spin", 2),
        ]
    );
    assert_eq!(clock.names().collect::<Vec<_>>(), ["water", "light orbit", "mesh spin"]);
}

#[test]
fn unregistered_callback_stops_running() {
    let count = Arc::new(Mutex::new(0));
    let mut clock = FrameClock::new();
    let mut scene = Scene::new();

    let counter = Arc::clone(&count);
    let id = clock.register("counter", move |_, _| *counter.lock().unwrap() += 1);

    clock.tick(&mut scene, 0.1);
    assert!(clock.unregister(id));
    clock.tick(&mut scene, 0.1);

    assert_eq!(*count.lock().unwrap(), 1);
    assert!(clock.is_empty());
}

#[test]
fn frame_state_accumulates_time() {
    let mut clock = FrameClock::new();
    let mut scene = Scene::new();

    clock.tick(&mut scene, 0.25);
    let state = clock.tick(&mut scene, 0.5);

    assert!((state.time - 0.75).abs() < 1e-6);
    assert!((state.dt - 0.5).abs() < 1e-6);
    assert_eq!(state.frame_count, 2);
    assert_eq!(clock.state(), state);
}

#[test]
fn callbacks_can_mutate_the_scene() {
    let mut clock = FrameClock::new();
    let mut scene = Scene::new();
    let node = scene.create_node("Mover");
    scene.attach_to_root(node);

    clock.register("move", move |scene, state| {
        if let Some(n) = scene.get_node_mut(node) {
            n.transform.position = Vec3::X * state.time;
        }
    });
    clock.tick(&mut scene, 2.0);

    assert_eq!(scene.get_node(node).unwrap().transform.position, Vec3::new(2.0, 0.0, 0.0));
}

// ============================================================================
// Water
// ============================================================================

#[test]
fn clock_drives_water_time() {
    let mut clock = FrameClock::new();
    let mut scene = Scene::new();
    let config = WaterConfig {
        rate: 0.1,
        ..WaterConfig::default()
    };
    let water = scene.add_surface(AnimatedSurface::new(config, normal_map()));

    clock.register("water", move |scene, state| {
        if let Some(surface) = scene.surface_of_mut(water) {
            surface.advance(state.dt);
        }
    });

    let mut last = 0.0;
    for _ in 0..10 {
        clock.tick(&mut scene, 0.1);
        let time = scene.surface_of(water).unwrap().time();
        assert!(time >= last);
        last = time;
    }

    let surface = scene.surface_of(water).unwrap();
    assert!((surface.time() - 0.1).abs() < 1e-5);
    assert!((surface.uniforms().time() - surface.time()).abs() < 1e-6);
    assert_eq!(surface.uniforms().version(), 10);
}

#[test]
fn zero_rate_freezes_water() {
    let mut scene = Scene::new();
    let config = WaterConfig {
        rate: 0.0,
        ..WaterConfig::default()
    };
    let water = scene.add_surface(AnimatedSurface::new(config, normal_map()));
    scene.surface_of_mut(water).unwrap().advance(5.0);
    assert_eq!(scene.surface_of(water).unwrap().time(), 0.0);
}

#[test]
fn water_config_from_json() {
    let config: WaterConfig =
        serde_json::from_str(r#"{ "rate": 0.2, "light_direction": [0.5, 1.0, 0.0], "fog": false }"#).unwrap();
    let surface = AnimatedSurface::new(config, normal_map());

    assert!((surface.rate() - 0.2).abs() < 1e-6);
    assert_eq!(surface.config().light_direction, Vec3::new(0.5, 1.0, 0.0));
    assert!(!surface.uniforms().fog_enabled());
    assert_eq!(surface.config().light_color.to_hex(), 0xAA_AAAA);
}

// ============================================================================
// Timer
// ============================================================================

#[test]
fn timer_counts_frames() {
    let mut timer = Timer::new();
    let dt = timer.tick();
    assert!(dt >= 0.0);
    timer.tick();
    assert_eq!(timer.frame_count, 2);
    assert!(timer.elapsed_seconds() >= timer.dt_seconds());
}

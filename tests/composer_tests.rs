//! Scene Composition Tests
//!
//! End-to-end tests for:
//! - SceneComposer: presets and JSON scenes composed from in-memory assets
//! - One-time tuning: glass window, shadow flags, shared cached instances
//! - RenderGraph: per-frame updates, debug key, resize, extraction
//! - Failure propagation: missing assets and materials abort composition

use std::sync::Arc;

use glam::Vec3;
use tidelight::assets::{AssetCache, MemoryAssetReader};
use tidelight::composer::{FrameSnapshot, ItemKind, LightSpec, ModelSpec, RenderGraph, Renderer, SceneComposer, SceneSpec};
use tidelight::errors::{Error, Result};
use tidelight::resources::{ButtonState, Input, Key, MaterialOverrides};
use tidelight::scene::directed_light::orbit_point;
use tidelight::scene::scene::Scene;

const HOUSE: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [{ "nodes": [0] }],
    "nodes": [
        { "name": "House", "children": [1, 2] },
        { "name": "Walls" },
        { "name": "Frame", "children": [3] },
        { "name": "Pane" }
    ],
    "materials": [{ "name": "window" }, { "name": "brick" }]
}"#;

const ISLAND: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [{ "nodes": [0, 1] }],
    "nodes": [{ "name": "Island" }, { "name": "Lighthouse", "translation": [-8.5, 0.0, -5.0] }],
    "materials": [{ "name": "sand" }]
}"#;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([128, 128, 255, 255]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

fn composer() -> SceneComposer {
    let reader = MemoryAssetReader::new()
        .with("models/house.glb", HOUSE.as_bytes().to_vec())
        .with("models/island.glb", ISLAND.as_bytes().to_vec())
        .with("textures/waternormals.jpg", png_bytes());
    SceneComposer::new(AssetCache::from_memory(reader))
}

fn compose(name: &str) -> RenderGraph {
    composer().compose(&SceneSpec::preset(name).unwrap()).unwrap()
}

fn assert_vec3_near(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-3, "{a} != {b}");
}

/// Records what it was asked to draw.
struct RecordingRenderer {
    size: (u32, u32),
    frames: Vec<FrameSnapshot>,
}

impl RecordingRenderer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            frames: Vec::new(),
        }
    }
}

impl Renderer for RecordingRenderer {
    fn viewport_size(&self) -> (u32, u32) {
        self.size
    }

    fn render(&mut self, frame: &FrameSnapshot, _scene: &Scene) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

// ============================================================================
// Rotating Box
// ============================================================================

#[test]
fn rotating_box_spins_each_frame() {
    let mut graph = compose("rotating_box");
    let input = Input::new();
    let node = graph.scene().find_node_by_name("RotatingBox").unwrap();

    assert_eq!(graph.clock().names().collect::<Vec<_>>(), ["mesh spin"]);

    graph.frame(&input, 0.5);
    graph.frame(&input, 0.5);

    let rotation = graph.scene().get_node(node).unwrap().transform.rotation;
    let expected = glam::Quat::from_euler(glam::EulerRot::XYZ, 1.0, 1.0, 0.0);
    assert!(rotation.angle_between(expected) < 1e-4);
}

#[test]
fn rotating_box_has_studio_lights() {
    let graph = compose("rotating_box");
    let scene = graph.scene();

    assert!((scene.ambient.intensity - 0.2).abs() < 1e-6);
    assert_eq!(scene.lights.len(), 2);
    let material = &scene.meshes.values().next().unwrap().material;
    assert_eq!(material.color.to_hex(), 0xFF_6347);
}

// ============================================================================
// House: one-time tuning
// ============================================================================

#[test]
fn house_window_is_glass() {
    let composer = composer();
    let graph = composer.compose(&SceneSpec::house()).unwrap();

    let instance = graph.scene().models.values().next().unwrap();
    let window = instance.asset.material("window").unwrap();
    assert!((window.emissive_intensity - 0.1).abs() < 1e-6);
    assert!((window.transmission - 1.0).abs() < 1e-6);

    let brick = instance.asset.material("brick").unwrap();
    assert!((brick.emissive_intensity - 1.0).abs() < 1e-6);
}

#[test]
fn house_nodes_cast_and_receive_shadows() {
    let graph = compose("house");
    let instance = graph.scene().models.values().next().unwrap();

    assert_eq!(instance.asset.node_count(), 4);
    assert!(instance.asset.nodes.values().all(|n| n.cast_shadow && n.receive_shadow));

    let model_node = graph.scene().find_node_by_name("models/house.glb").unwrap();
    let node = graph.scene().get_node(model_node).unwrap();
    assert!(node.cast_shadows && node.receive_shadows);
}

#[test]
fn recomposing_reuses_the_cached_model() {
    let composer = composer();
    let first = composer.compose(&SceneSpec::house()).unwrap();
    let second = composer.compose(&SceneSpec::house()).unwrap();

    let a = &first.scene().models.values().next().unwrap().asset;
    let b = &second.scene().models.values().next().unwrap().asset;
    assert!(Arc::ptr_eq(a, b));
    assert_eq!(composer.cache().model_count(), 1);

    // Tuned exactly once: the cached asset still carries the glass values
    assert!((b.material("window").unwrap().emissive_intensity - 0.1).abs() < 1e-6);
}

#[test]
fn missing_material_aborts_composition() {
    let composer = composer();
    let spec = SceneSpec {
        models: vec![ModelSpec::new("models/house.glb").with_override("chimney", MaterialOverrides::glass())],
        ..SceneSpec::house()
    };

    let err = composer.compose(&spec).unwrap_err();
    assert!(matches!(err, Error::MaterialNotFound { ref material, .. } if material == "chimney"));
    assert_eq!(composer.cache().model_count(), 0);
}

#[test]
fn missing_model_aborts_composition() {
    let spec = SceneSpec {
        models: vec![ModelSpec::new("models/castle.glb")],
        ..SceneSpec::default()
    };

    let err = composer().compose(&spec).unwrap_err();
    assert!(matches!(err, Error::AssetLoad { ref url, .. } if url == "models/castle.glb"));
}

#[test]
fn emissive_override_changes_only_that_field() {
    let composer = composer();
    let untouched = composer.cache().load_model("models/house.glb").unwrap();
    let before = untouched.material("window").unwrap().clone();

    let overrides = MaterialOverrides {
        emissive_intensity: Some(0.1),
        ..MaterialOverrides::new()
    };
    let spec = SceneSpec {
        models: vec![ModelSpec::new("models/house.glb").with_override("window", overrides)],
        ..SceneSpec::house()
    };
    let graph = composer.compose(&spec).unwrap();

    let instance = graph.scene().models.values().next().unwrap();
    let mut expected = before;
    expected.emissive_intensity = 0.1;
    assert_eq!(instance.asset.material("window").unwrap(), &expected);
    assert_eq!(
        instance.asset.material("brick").unwrap(),
        untouched.material("brick").unwrap()
    );
}

// ============================================================================
// Tuning on cached models
// ============================================================================

#[test]
fn missing_material_fails_after_model_is_cached() {
    let composer = composer();
    composer.compose(&SceneSpec::house()).unwrap();

    let spec = SceneSpec {
        models: vec![
            ModelSpec::new("models/house.glb")
                .with_override("window", MaterialOverrides::glass())
                .with_override("chimney", MaterialOverrides::glass()),
        ],
        ..SceneSpec::house()
    };
    let err = composer.compose(&spec).unwrap_err();
    assert!(matches!(err, Error::MaterialNotFound { ref material, .. } if material == "chimney"));
}

#[test]
fn different_overrides_get_their_own_instance() {
    let composer = composer();
    let glass = composer.compose(&SceneSpec::house()).unwrap();

    let glow = MaterialOverrides {
        emissive_intensity: Some(0.9),
        ..MaterialOverrides::new()
    };
    let spec = SceneSpec {
        models: vec![ModelSpec::new("models/house.glb").with_override("window", glow)],
        ..SceneSpec::house()
    };
    let glowing = composer.compose(&spec).unwrap();

    let a = &glass.scene().models.values().next().unwrap().asset;
    let b = &glowing.scene().models.values().next().unwrap().asset;
    assert!(!Arc::ptr_eq(a, b));
    assert!((a.material("window").unwrap().emissive_intensity - 0.1).abs() < 1e-6);
    assert!((b.material("window").unwrap().emissive_intensity - 0.9).abs() < 1e-6);
    assert_eq!(composer.cache().model_count(), 2);
}

#[test]
fn same_url_twice_in_one_scene() {
    let composer = composer();
    let glow = MaterialOverrides {
        emissive_intensity: Some(0.9),
        ..MaterialOverrides::new()
    };
    let spec = SceneSpec {
        models: vec![
            ModelSpec::new("models/house.glb").with_override("window", MaterialOverrides::glass()),
            ModelSpec::new("models/house.glb").with_override("window", glow),
            ModelSpec::new("models/house.glb").with_override("window", MaterialOverrides::glass()),
        ],
        ..SceneSpec::house()
    };
    let graph = composer.compose(&spec).unwrap();

    let mut intensities: Vec<f32> = Vec::new();
    let mut assets = Vec::new();
    for (_, instance) in &graph.scene().models {
        intensities.push(instance.asset.material("window").unwrap().emissive_intensity);
        assets.push(instance.asset.clone());
    }
    intensities.sort_by(f32::total_cmp);
    assert_eq!(intensities.len(), 3);
    assert!((intensities[0] - 0.1).abs() < 1e-6);
    assert!((intensities[1] - 0.1).abs() < 1e-6);
    assert!((intensities[2] - 0.9).abs() < 1e-6);

    // The two glass entries share one instance
    let shared = assets.iter().filter(|a| (a.material("window").unwrap().emissive_intensity - 0.1).abs() < 1e-6);
    let shared: Vec<_> = shared.collect();
    assert!(Arc::ptr_eq(shared[0], shared[1]));
    assert_eq!(composer.cache().model_count(), 2);
}

// ============================================================================
// Spotlight Bench
// ============================================================================

#[test]
fn spotlight_bench_aims_at_origin() {
    let graph = compose("spotlight_bench");
    let scene = graph.scene();

    let [light] = graph.directed_lights() else {
        panic!("expected one directed light");
    };
    assert!(light.is_target_attached(scene));
    let expected = (Vec3::ZERO - Vec3::new(5.0, 10.0, 5.0)).normalize();
    assert_vec3_near(light.direction(scene).unwrap(), expected);

    let floor = scene.get_node(scene.find_node_by_name("Floor").unwrap()).unwrap();
    assert!(floor.receive_shadows && !floor.cast_shadows);
    let test_box = scene.get_node(scene.find_node_by_name("TestBox").unwrap()).unwrap();
    assert!(test_box.cast_shadows);
    assert_eq!(test_box.transform.position, Vec3::new(0.0, 2.0, 0.0));

    // No animation registered
    assert!(graph.clock().is_empty());
}

#[test]
fn spotlight_bench_renders_both_meshes() {
    let mut graph = compose("spotlight_bench");
    let mut renderer = RecordingRenderer::new(800, 600);

    graph.frame(&Input::new(), 0.016);
    graph.render(&mut renderer).unwrap();

    let frame = &renderer.frames[0];
    assert_eq!(frame.item_count(), 2);
    assert!(frame.items.iter().all(|i| matches!(i.kind, ItemKind::Mesh(_))));
    assert_eq!(frame.lights.len(), 1);
    assert!(frame.lights[0].direction.is_some());
    assert!(frame.lights[0].cast_shadows);
    assert_eq!(frame.frame_count, 1);
}

// ============================================================================
// Island
// ============================================================================

#[test]
fn island_animates_water_and_light() {
    let mut graph = compose("island");
    let input = Input::new();

    assert_eq!(graph.clock().names().collect::<Vec<_>>(), ["water", "light orbit"]);

    let mut report = graph.frame(&input, 0.25);
    for _ in 0..3 {
        report = graph.frame(&input, 0.25);
    }
    assert_eq!(report.state.frame_count, 4);
    assert!((report.state.time - 1.0).abs() < 1e-6);

    let water = graph.scene().surface_of(graph.surface_node().unwrap()).unwrap();
    assert!((water.time() - 0.1).abs() < 1e-5);

    let light = graph.directed_lights()[0];
    let target = graph.scene().world_position(light.target_node()).unwrap();
    assert_vec3_near(target, orbit_point(50.0, 1.0));
    assert!(light.direction(graph.scene()).is_some());
}

#[test]
fn island_scene_setup() {
    let graph = compose("island");
    let scene = graph.scene();

    assert_vec3_near(scene.background.unwrap(), Vec3::new(0.0, 5.0 / 255.0, 16.0 / 255.0));
    assert!((scene.ambient.intensity - 0.1).abs() < 1e-6);

    let camera = scene.main_camera().unwrap();
    assert!((camera.far - 20_000.0).abs() < 1e-3);

    let water = scene.surface_of(graph.surface_node().unwrap()).unwrap();
    assert_eq!(water.normal_map().width, 2);
    let water_node = scene.get_node(graph.surface_node().unwrap()).unwrap();
    assert!(water_node.receive_shadows);

    let model = scene.models.values().next().unwrap();
    assert_eq!(model.asset.node(model.asset.root()).unwrap().children().len(), 2);
}

#[test]
fn debug_key_reports_camera() {
    let mut graph = compose("island");
    let mut input = Input::new();

    let report = graph.frame(&input, 0.016);
    assert!(report.debug.is_none());

    input.inject_key(Key::P, ButtonState::Pressed);
    let snapshot = graph.handle_debug_key(&input).unwrap();
    assert_eq!(snapshot.target, Vec3::ZERO);
    assert!(snapshot.to_string().starts_with("camera position: ["));

    let report = graph.frame(&input, 0.016);
    assert!(report.debug.is_some());

    // Held, not pressed again
    input.start_frame();
    assert!(graph.frame(&input, 0.016).debug.is_none());
}

#[test]
fn debug_key_does_not_change_the_graph() {
    let mut graph = compose("spotlight_bench");
    let mut input = Input::new();
    input.inject_key(Key::P, ButtonState::Pressed);

    let before = graph.debug_snapshot();
    let snapshot = graph.handle_debug_key(&input).unwrap();
    assert_eq!(snapshot, before);
    assert_vec3_near(snapshot.camera_position, Vec3::new(10.0, 10.0, 10.0));
    assert_eq!(graph.clock().state().frame_count, 0);
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn render_matches_viewport_aspect() {
    let mut graph = compose("rotating_box");
    let mut renderer = RecordingRenderer::new(1000, 500);
    graph.render(&mut renderer).unwrap();

    let camera = graph.scene().main_camera().unwrap();
    assert!((camera.aspect - 2.0).abs() < 1e-6);

    graph.resize(0, 720);
    assert!((graph.scene().main_camera().unwrap().aspect - 2.0).abs() < 1e-6);
}

// ============================================================================
// JSON Scenes
// ============================================================================

#[test]
fn compose_from_json() {
    let spec = SceneSpec::from_json_str(
        r##"{
            "name": "json_house",
            "camera": { "position": [0, 5, 12] },
            "lights": [
                { "type": "ambient", "intensity": 0.3 },
                { "type": "spot", "position": [0, 6, 0], "orbit_radius": 4 }
            ],
            "models": [{
                "url": "models/house.glb",
                "material_overrides": { "window": { "emissive": "orange", "emissive_intensity": 0.1 } },
                "shadows": { "cast": true }
            }],
            "meshes": [{ "name": "Ground", "geometry": { "shape": "plane", "width": 20, "height": 20 } }]
        }"##,
    )
    .unwrap();
    let graph = composer().compose(&spec).unwrap();
    let scene = graph.scene();

    assert_eq!(graph.name(), "json_house");
    assert!(scene.find_node_by_name("Ground").is_some());
    assert_eq!(graph.clock().names().collect::<Vec<_>>(), ["light orbit"]);

    let asset = &scene.models.values().next().unwrap().asset;
    assert!((asset.material("window").unwrap().emissive_intensity - 0.1).abs() < 1e-6);
    assert!(asset.nodes.values().all(|n| n.cast_shadow && !n.receive_shadow));
}

#[test]
fn several_ambient_lights_last_wins() {
    let spec = SceneSpec {
        lights: vec![
            LightSpec::Ambient(tidelight::composer::AmbientLightSpec {
                intensity: 0.5,
                ..Default::default()
            }),
            LightSpec::Ambient(tidelight::composer::AmbientLightSpec {
                intensity: 0.25,
                ..Default::default()
            }),
        ],
        ..SceneSpec::default()
    };
    let graph = composer().compose(&spec).unwrap();
    assert!((graph.scene().ambient.intensity - 0.25).abs() < 1e-6);
}

#[test]
fn invalid_spec_is_rejected_before_loading() {
    let spec = SceneSpec {
        models: vec![ModelSpec::new("  ")],
        ..SceneSpec::default()
    };
    let composer = composer();
    assert!(matches!(composer.compose(&spec), Err(Error::InvalidScene(_))));
    assert_eq!(composer.cache().model_count(), 0);
}

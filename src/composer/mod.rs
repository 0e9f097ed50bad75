//! Live scene composition
//!
//! [`SceneComposer`] turns a declarative [`SceneSpec`] into a running
//! [`RenderGraph`]: it loads every model and texture through the
//! [`AssetCache`] (preparing models once via the post-load hook), builds the
//! scene, and registers the per-frame updates on the graph's [`FrameClock`].

pub mod extract;
pub mod graph;
pub mod spec;

use std::sync::Arc;

use futures::future::try_join_all;
use glam::Vec3;

pub use extract::{ExtractedItem, ExtractedLight, FrameSnapshot, ItemKind, Renderer};
pub use graph::{DIAGNOSTICS_TARGET, DebugSnapshot, FrameReport, RenderGraph};
pub use spec::{
    AmbientLightSpec, CameraSpec, ControlsSpec, DirectionalLightSpec, LightSpec, MeshSpec, ModelSpec,
    PointLightSpec, SceneSpec, TransformSpec, WaterSpec,
};

use crate::assets::cache::block_on_assets;
use crate::assets::{AssetCache, ModelAsset};
use crate::clock::FrameClock;
use crate::errors::Result;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::resources::texture::{Texture, TextureSampler};
use crate::scene::camera::Camera;
use crate::scene::directed_light::DirectedLight;
use crate::scene::light::Light;
use crate::scene::water::AnimatedSurface;
use crate::scene::{AmbientLight, NodeKey, Scene};
use crate::tuning::{MaterialTuner, ShadowFlagger};
use crate::utils::orbit_control::OrbitControls;

/// Aspect used until the first resize.
const INITIAL_ASPECT: f32 = 16.0 / 9.0;

/// Assembles scenes from [`SceneSpec`]s.
///
/// All assets are awaited before the scene is built, so a graph never holds a
/// component whose asset is still loading. Any failure aborts composition
/// and is returned unchanged.
#[derive(Clone)]
pub struct SceneComposer {
    cache: AssetCache,
}

impl SceneComposer {
    #[must_use]
    pub fn new(cache: AssetCache) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Blocking [`compose_async`](Self::compose_async).
    pub fn compose(&self, spec: &SceneSpec) -> Result<RenderGraph> {
        block_on_assets(self.compose_async(spec))
    }

    pub async fn compose_async(&self, spec: &SceneSpec) -> Result<RenderGraph> {
        spec.validate()?;

        let models = try_join_all(spec.models.iter().map(|model| self.load_model(model))).await?;

        let normal_map = match &spec.water {
            Some(water) => Some(
                self.cache
                    .load_texture_async(&water.normal_map, TextureSampler::repeat())
                    .await?,
            ),
            None => None,
        };

        Self::assemble(spec, models, normal_map)
    }

    /// Loads a model, tuning its materials and shadow flags once on arrival.
    ///
    /// Each distinct tuning of a URL is its own cached instance, so a hit
    /// always carries exactly the overrides `spec` declares.
    async fn load_model(&self, spec: &ModelSpec) -> Result<Arc<ModelAsset>> {
        let overrides = &spec.material_overrides;
        let shadows = spec.shadows;
        let label = spec.tuning_label()?;

        self.cache
            .load_model_variant_async(&spec.url, &label, |asset| {
                for (material, set) in overrides {
                    MaterialTuner::tune(asset, material, set)?;
                }
                if !shadows.is_empty() {
                    ShadowFlagger::flag(asset, shadows);
                }
                Ok(())
            })
            .await
    }

    fn assemble(
        spec: &SceneSpec,
        models: Vec<Arc<ModelAsset>>,
        normal_map: Option<Arc<Texture>>,
    ) -> Result<RenderGraph> {
        let mut scene = Scene::new();
        let mut clock = FrameClock::new();
        scene.background = spec.background.map(|c| c.to_vec3());

        // ==== Camera ====
        let cam = &spec.camera;
        let camera_node = scene.add_camera(Camera::new_perspective(cam.fov, INITIAL_ASPECT, cam.near, cam.far));
        if let Some(node) = scene.get_node_mut(camera_node) {
            node.transform.position = cam.position;
            node.transform.look_at(cam.target, Vec3::Y);
        }
        scene.active_camera = Some(camera_node);

        // ==== Lights ====
        let mut directed_lights = Vec::new();
        for light in &spec.lights {
            match light {
                LightSpec::Ambient(ambient) => {
                    if scene.ambient.intensity > 0.0 {
                        log::warn!("Scene '{}' declares several ambient lights; the last one wins", spec.name);
                    }
                    scene.ambient = AmbientLight {
                        color: ambient.color.to_vec3(),
                        intensity: ambient.intensity,
                    };
                }
                LightSpec::Point(point) => {
                    let mut light = Light::new_point(point.color.to_vec3(), point.intensity, point.distance);
                    light.cast_shadows = point.cast_shadows;
                    add_placed_light(&mut scene, light, point.position);
                }
                LightSpec::Directional(dir) => {
                    let mut light = Light::new_directional(dir.color.to_vec3(), dir.intensity);
                    light.cast_shadows = dir.cast_shadows;
                    add_placed_light(&mut scene, light, dir.position);
                }
                LightSpec::Spot(config) => {
                    let directed = DirectedLight::spawn(&mut scene, config)?;
                    directed.attach_target(&mut scene);
                    directed_lights.push(directed);
                }
            }
        }

        // ==== Models ====
        for (model_spec, asset) in spec.models.iter().zip(models) {
            let key = scene.add_model(asset);
            if let Some(node) = scene.get_node_mut(key) {
                model_spec.transform.apply(&mut node.transform);
                node.cast_shadows = model_spec.shadows.cast.unwrap_or(false);
                node.receive_shadows = model_spec.shadows.receive.unwrap_or(false);
            }
        }

        // ==== Primitive meshes ====
        let mut any_spin = false;
        for mesh_spec in &spec.meshes {
            let material = Material::new(format!("{}_material", mesh_spec.name)).with_color(mesh_spec.color);
            let mut mesh = Mesh::new(mesh_spec.geometry, material).with_name(&mesh_spec.name);
            if let Some(spin) = mesh_spec.spin {
                mesh = mesh.with_spin(spin);
                mesh.spin_angles = mesh_spec.transform.rotation;
                any_spin = true;
            }

            let key = scene.add_mesh(mesh);
            if let Some(node) = scene.get_node_mut(key) {
                mesh_spec.transform.apply(&mut node.transform);
                node.cast_shadows = mesh_spec.cast_shadows;
                node.receive_shadows = mesh_spec.receive_shadows;
            }
        }

        // ==== Water ====
        let surface = match (&spec.water, normal_map) {
            (Some(water), Some(normals)) => {
                let key = scene.add_surface(AnimatedSurface::new(water.config.clone(), normals));
                if let Some(node) = scene.get_node_mut(key) {
                    water.transform.apply(&mut node.transform);
                    node.receive_shadows = true;
                }
                Some(key)
            }
            _ => None,
        };

        // ==== Per-frame updates, in order: water, light orbits, spin ====
        if let Some(key) = surface {
            clock.register("water", move |scene, state| {
                if let Some(surface) = scene.surface_of_mut(key) {
                    surface.advance(state.dt);
                }
            });
        }
        for directed in directed_lights.iter().copied().filter(|d| d.orbit_radius().is_some()) {
            clock.register("light orbit", move |scene, state| {
                directed.advance(scene, state.time);
            });
        }
        if any_spin {
            clock.register("mesh spin", |scene, state| scene.update_spin(state.dt));
        }

        // ==== Controls ====
        let controls = spec.controls.map(|settings| {
            let mut controls = OrbitControls::new(cam.position, cam.target);
            controls.enable_damping = settings.enable_damping;
            controls.min_distance = settings.min_distance;
            controls.max_distance = settings.max_distance;
            controls
        });

        scene.update_matrix_world();

        log::info!(
            "Composed scene '{}': {} nodes, {} lights, {} models, {} meshes, water: {}",
            spec.name,
            scene.nodes.len(),
            scene.lights.len(),
            scene.models.len(),
            scene.meshes.len(),
            surface.is_some()
        );

        Ok(RenderGraph::new(
            spec.name.clone(),
            scene,
            clock,
            controls,
            camera_node,
            cam.target,
            directed_lights,
            surface,
        ))
    }
}

fn add_placed_light(scene: &mut Scene, light: Light, position: Vec3) -> NodeKey {
    let cast = light.cast_shadows;
    let key = scene.add_light(light);
    if let Some(node) = scene.get_node_mut(key) {
        node.transform.position = position;
        node.cast_shadows = cast;
    }
    key
}

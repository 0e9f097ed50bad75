//! Extract phase
//!
//! Before handing a frame to the renderer, the graph copies the small
//! per-frame data (matrices, light parameters, keys into the scene pools)
//! into a [`FrameSnapshot`]. The renderer resolves keys against the scene it
//! is given; it never walks the hierarchy itself.

use glam::{Mat4, Vec3};

use crate::errors::Result;
use crate::scene::camera::Camera;
use crate::scene::light::LightKind;
use crate::scene::{MeshKey, ModelKey, NodeKey, Scene, SurfaceKey};

/// What an extracted item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Mesh(MeshKey),
    Model(ModelKey),
    Surface(SurfaceKey),
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractedItem {
    pub node: NodeKey,
    pub kind: ItemKind,
    pub world_matrix: Mat4,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    /// Squared distance to the camera (for sorting)
    pub distance_sq: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedLightKind {
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractedLight {
    pub node: NodeKey,
    pub kind: ExtractedLightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// `None` for point lights and for spot lights whose target is not attached
    pub direction: Option<Vec3>,
    pub cast_shadows: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractedCamera {
    pub view_projection: Mat4,
    pub position: Vec3,
    pub fov: f32,
    pub aspect: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub camera: Option<ExtractedCamera>,
    pub items: Vec<ExtractedItem>,
    pub lights: Vec<ExtractedLight>,
    pub ambient: Vec3,
    pub background: Option<Vec3>,
    pub frame_count: u64,
}

impl FrameSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears data for reuse
    pub fn clear(&mut self) {
        self.camera = None;
        self.items.clear();
        self.lights.clear();
    }

    /// Refills this snapshot from `scene`, reusing its allocations.
    ///
    /// Only attached, visible nodes are extracted; an invisible node hides
    /// its subtree. Meshes outside the camera frustum are culled.
    pub fn extract_into(&mut self, scene: &Scene, camera: Option<&Camera>) {
        self.clear();

        self.camera = camera.map(|cam| ExtractedCamera {
            view_projection: cam.view_projection_matrix(),
            position: cam.world_position(),
            fov: cam.fov,
            aspect: cam.aspect,
        });
        self.ambient = scene.ambient.color * scene.ambient.intensity;
        self.background = scene.background;

        let camera_pos = camera.map_or(Vec3::ZERO, Camera::world_position);

        let mut stack: Vec<NodeKey> = scene.root_nodes.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = scene.nodes.get(key) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            stack.extend(node.children().iter().rev().copied());

            let world = *node.world_matrix();
            let position: Vec3 = world.translation.into();

            if let Some(light) = node.light.and_then(|k| scene.lights.get(k)) {
                let kind = match light.kind {
                    LightKind::Directional(_) => ExtractedLightKind::Directional,
                    LightKind::Point(_) => ExtractedLightKind::Point,
                    LightKind::Spot(_) => ExtractedLightKind::Spot,
                };
                self.lights.push(ExtractedLight {
                    node: key,
                    kind,
                    color: light.color,
                    intensity: light.intensity,
                    position,
                    direction: scene.light_direction(key),
                    cast_shadows: light.cast_shadows,
                });
            }

            let kind = if let Some(mesh_key) = node.mesh {
                let Some(mesh) = scene.meshes.get(mesh_key) else {
                    log::warn!("Node {key:?} refers to missing Mesh {mesh_key:?}");
                    continue;
                };
                if !mesh.visible {
                    continue;
                }
                if let Some(cam) = camera {
                    let bounds = mesh.geometry.bounding_box().transform(&world);
                    let radius = bounds.size().length() * 0.5;
                    if !cam.frustum().intersects_sphere(bounds.center(), radius) {
                        continue;
                    }
                }
                ItemKind::Mesh(mesh_key)
            } else if let Some(model) = node.model {
                ItemKind::Model(model)
            } else if let Some(surface) = node.surface {
                ItemKind::Surface(surface)
            } else {
                continue;
            };

            self.items.push(ExtractedItem {
                node: key,
                kind,
                world_matrix: Mat4::from(world),
                cast_shadows: node.cast_shadows,
                receive_shadows: node.receive_shadows,
                distance_sq: camera_pos.distance_squared(position),
            });
        }
    }

    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The external renderer.
///
/// Receives one snapshot per frame plus read access to the scene for
/// resolving pool keys (mesh geometry, model assets, water uniforms).
pub trait Renderer {
    /// Current drawable size in physical pixels.
    fn viewport_size(&self) -> (u32, u32);

    fn render(&mut self, frame: &FrameSnapshot, scene: &Scene) -> Result<()>;
}

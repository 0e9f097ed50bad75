use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::ModelAsset;
use crate::resources::mesh::Mesh;
use crate::scene::camera::Camera;
use crate::scene::light::{Light, LightKind};
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::water::AnimatedSurface;
use crate::scene::{CameraKey, LightKey, MeshKey, ModelKey, NodeKey, SurfaceKey};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Uniform light applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.0,
        }
    }
}

/// A placed, shared, read-only model.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub asset: Arc<ModelAsset>,
}

/// The frame graph.
///
/// Pure data: hierarchy in `nodes`/`root_nodes`, components in the pools.
/// A node is part of the rendered graph only while it is *attached*, i.e.
/// listed in `root_nodes` or parented (transitively) to a root.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeKey, Node>,
    pub root_nodes: Vec<NodeKey>,

    // ==== Component pools ====
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub surfaces: SlotMap<SurfaceKey, AnimatedSurface>,
    pub models: SlotMap<ModelKey, ModelInstance>,

    pub ambient: AmbientLight,
    pub background: Option<Vec3>,

    pub active_camera: Option<NodeKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),

            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),

            meshes: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            surfaces: SlotMap::with_key(),
            models: SlotMap::with_key(),

            ambient: AmbientLight::default(),
            background: Some(Vec3::ZERO),

            active_camera: None,
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Creates a detached node. It is not rendered until attached.
    pub fn create_node(&mut self, name: &str) -> NodeKey {
        self.nodes.insert(Node::new(name))
    }

    /// Inserts a node at the root of the graph.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.root_nodes.push(key);
        key
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeKey) -> NodeKey {
        let key = self.nodes.insert(child);
        self.attach(key, parent);
        key
    }

    /// Re-parents `child` under `parent`, detaching it from wherever it was.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }
        if self.is_ancestor_of(child, parent) {
            log::warn!("Cannot attach a node below its own descendant");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Adds an existing node to the root list (the `scene.add(obj)` of other
    /// engines). Idempotent for nodes already at the root.
    pub fn attach_to_root(&mut self, key: NodeKey) {
        if !self.nodes.contains_key(key) || self.root_nodes.contains(&key) {
            return;
        }
        self.detach(key);
        self.root_nodes.push(key);
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.mark_dirty();
        }
    }

    /// Unlinks `key` from its parent or from the root list. The node and its
    /// subtree stay alive but are no longer attached.
    pub fn detach(&mut self, key: NodeKey) {
        let old_parent = self.nodes.get(key).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(i) = parent.children.iter().position(|&x| x == key)
            {
                parent.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == key) {
            self.root_nodes.remove(i);
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
    }

    /// Removes a node, its subtree and every component they own.
    pub fn remove_node(&mut self, key: NodeKey) {
        if !self.nodes.contains_key(key) {
            return;
        }
        self.detach(key);

        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(node) = self.nodes.remove(k) else {
                continue;
            };
            stack.extend(node.children.iter().copied());

            if let Some(mesh) = node.mesh {
                self.meshes.remove(mesh);
            }
            if let Some(camera) = node.camera {
                self.cameras.remove(camera);
            }
            if let Some(light) = node.light {
                self.lights.remove(light);
            }
            if let Some(surface) = node.surface {
                self.surfaces.remove(surface);
            }
            if let Some(model) = node.model {
                self.models.remove(model);
            }
            if self.active_camera == Some(k) {
                self.active_camera = None;
            }
        }
    }

    /// Whether `key` is reachable from the root list.
    #[must_use]
    pub fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = key;
        for _ in 0..=self.nodes.len() {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            match node.parent {
                Some(parent) => current = parent,
                None => return self.root_nodes.contains(&current),
            }
        }
        false
    }

    fn is_ancestor_of(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = self.nodes.get(key).and_then(|n| n.parent);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.nodes.get(k).and_then(|n| n.parent);
        }
        false
    }

    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Finds the first node with the given name.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find_map(|(key, node)| (node.name == name).then_some(key))
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeKey {
        let mut node = Node::new(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_node(node)
    }

    pub fn add_camera(&mut self, camera: Camera) -> NodeKey {
        let mut node = Node::new("Camera");
        node.camera = Some(self.cameras.insert(camera));
        self.add_node(node)
    }

    pub fn add_light(&mut self, light: Light) -> NodeKey {
        let mut node = Node::new("Light");
        node.light = Some(self.lights.insert(light));
        self.add_node(node)
    }

    pub fn add_surface(&mut self, surface: AnimatedSurface) -> NodeKey {
        let mut node = Node::new("Water");
        node.surface = Some(self.surfaces.insert(surface));
        self.add_node(node)
    }

    pub fn add_model(&mut self, asset: Arc<ModelAsset>) -> NodeKey {
        let mut node = Node::new(asset.url());
        node.model = Some(self.models.insert(ModelInstance { asset }));
        self.add_node(node)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let node_id = self.active_camera?;
        self.query_camera_bundle(node_id)
    }

    pub fn query_camera_bundle(&mut self, node_id: NodeKey) -> Option<(&mut Transform, &mut Camera)> {
        let camera_key = self.nodes.get(node_id)?.camera?;
        let camera = self.cameras.get_mut(camera_key)?;
        let transform = &mut self.nodes.get_mut(node_id)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        let node = self.nodes.get(self.active_camera?)?;
        self.cameras.get(node.camera?)
    }

    #[must_use]
    pub fn light_of(&self, node: NodeKey) -> Option<&Light> {
        self.lights.get(self.nodes.get(node)?.light?)
    }

    pub fn light_of_mut(&mut self, node: NodeKey) -> Option<&mut Light> {
        let key = self.nodes.get(node)?.light?;
        self.lights.get_mut(key)
    }

    #[must_use]
    pub fn surface_of(&self, node: NodeKey) -> Option<&AnimatedSurface> {
        self.surfaces.get(self.nodes.get(node)?.surface?)
    }

    pub fn surface_of_mut(&mut self, node: NodeKey) -> Option<&mut AnimatedSurface> {
        let key = self.nodes.get(node)?.surface?;
        self.surfaces.get_mut(key)
    }

    /// World matrix from the live TRS of the ancestor chain.
    #[must_use]
    pub fn world_matrix(&self, key: NodeKey) -> Option<Affine3A> {
        transform_system::compute_world_matrix(&self.nodes, key)
    }

    #[must_use]
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_matrix(key).map(|m| m.translation.into())
    }

    /// Direction a light shines in, in world space.
    ///
    /// Spot lights aim at their target and have no direction unless that
    /// target is attached to this scene. Directional lights aim at the
    /// origin. Point lights have none.
    #[must_use]
    pub fn light_direction(&self, light_node: NodeKey) -> Option<Vec3> {
        let light = self.light_of(light_node)?;
        let from = self.world_position(light_node)?;

        let to = match &light.kind {
            LightKind::Spot(spot) => {
                let target = spot.target?;
                if !self.is_attached(target) {
                    return None;
                }
                self.world_position(target)?
            }
            LightKind::Directional(_) => Vec3::ZERO,
            LightKind::Point(_) => return None,
        };

        let dir = (to - from).normalize_or_zero();
        (dir != Vec3::ZERO).then_some(dir)
    }

    /// Lights whose node is attached, with their node keys.
    pub fn iter_active_lights(&self) -> impl Iterator<Item = (NodeKey, &Light)> {
        self.nodes.iter().filter_map(move |(key, node)| {
            let light = self.lights.get(node.light?)?;
            self.is_attached(key).then_some((key, light))
        })
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Propagates transforms into world matrices (and camera matrices).
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &mut self.cameras, &self.root_nodes);
    }

    /// Advances mesh spin animations by `dt` seconds.
    ///
    /// Angles accumulate on the mesh, so they never go through a
    /// quaternion-to-Euler round trip.
    pub fn update_spin(&mut self, dt: f32) {
        for node in self.nodes.values_mut() {
            let Some(mesh) = node.mesh.and_then(|m| self.meshes.get_mut(m)) else {
                continue;
            };
            if let Some(euler) = mesh.advance_spin(dt) {
                node.transform.set_rotation_euler(euler.x, euler.y, euler.z);
            }
        }
    }
}

use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{CameraKey, LightKey, MeshKey, ModelKey, NodeKey, SurfaceKey};

/// A scene graph node.
///
/// Hierarchy and transform live here; heavier components (meshes, cameras,
/// lights, water surfaces, model instances) are stored in the scene's pools
/// and referenced by key.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    pub transform: Transform,
    pub visible: bool,

    pub cast_shadows: bool,
    pub receive_shadows: bool,

    // === Components ===
    pub mesh: Option<MeshKey>,
    pub camera: Option<CameraKey>,
    pub light: Option<LightKey>,
    pub surface: Option<SurfaceKey>,
    pub model: Option<ModelKey>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            cast_shadows: false,
            receive_shadows: false,
            mesh: None,
            camera: None,
            light: None,
            surface: None,
            model: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// World matrix as of the last transform-system pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

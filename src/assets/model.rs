use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::resources::material::Material;
use crate::scene::transform::Transform;

new_key_type! {
    pub struct AssetNodeKey;
}

/// A node of a loaded model's own hierarchy.
#[derive(Debug, Clone)]
pub struct AssetNode {
    pub name: String,
    pub(crate) parent: Option<AssetNodeKey>,
    pub(crate) children: Vec<AssetNodeKey>,
    pub transform: Transform,
    /// Names of the materials used by this node's primitives
    pub materials: Vec<String>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl AssetNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            materials: Vec::new(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<AssetNodeKey> {
        self.parent
    }

    /// Children in declaration order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[AssetNodeKey] {
        &self.children
    }
}

/// A decoded 3D model: its node tree and its material table.
///
/// Mutable only while it is owned by the loader (see
/// [`AssetCache::load_model_with`](crate::assets::AssetCache::load_model_with)).
/// Once cached it is shared read-only as `Arc<ModelAsset>`.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    url: String,
    pub nodes: SlotMap<AssetNodeKey, AssetNode>,
    root: AssetNodeKey,
    pub materials: FxHashMap<String, Material>,
}

impl ModelAsset {
    /// Creates an asset holding only a root node.
    #[must_use]
    pub fn new(url: impl Into<String>, root: AssetNode) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(root);
        Self {
            url: url.into(),
            nodes,
            root,
            materials: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> AssetNodeKey {
        self.root
    }

    /// Appends `node` as the last child of `parent`. `None` if the parent
    /// does not exist.
    pub fn add_child(&mut self, parent: AssetNodeKey, mut node: AssetNode) -> Option<AssetNodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        self.nodes.get_mut(parent)?.children.push(key);
        Some(key)
    }

    #[must_use]
    pub fn node(&self, key: AssetNodeKey) -> Option<&AssetNode> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: AssetNodeKey) -> Option<&mut AssetNode> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<AssetNodeKey> {
        self.nodes
            .iter()
            .find_map(|(key, node)| (node.name == name).then_some(key))
    }

    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// Inserts a material under its own name, replacing any previous one.
    pub fn insert_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Sorted material names, for stable diagnostics.
    #[must_use]
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

//! One-time preparation of freshly loaded models.
//!
//! Both passes run from the post-load hook of
//! [`AssetCache::load_model_with`](crate::assets::AssetCache::load_model_with),
//! while the asset is still exclusively owned. They are never run per frame.

use serde::{Deserialize, Serialize};

use crate::assets::model::{AssetNodeKey, ModelAsset};
use crate::errors::{Error, Result};
use crate::resources::material::MaterialOverrides;

/// Applies property overrides to a named material of a loaded asset.
pub struct MaterialTuner;

impl MaterialTuner {
    /// Writes every field present in `overrides` onto `asset.materials[name]`.
    ///
    /// An unknown name fails with [`Error::MaterialNotFound`] and leaves all
    /// materials untouched.
    pub fn tune(asset: &mut ModelAsset, material_name: &str, overrides: &MaterialOverrides) -> Result<()> {
        let url = asset.url().to_string();
        let Some(material) = asset.material_mut(material_name) else {
            return Err(Error::MaterialNotFound {
                asset: url,
                material: material_name.to_string(),
            });
        };

        overrides.apply_to(material);
        log::debug!("Tuned material '{material_name}' of {url}");
        Ok(())
    }
}

/// Which shadow flags to force; `None` leaves a flag as loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowFlags {
    pub cast: Option<bool>,
    pub receive: Option<bool>,
}

impl ShadowFlags {
    /// Cast and receive.
    #[must_use]
    pub fn both() -> Self {
        Self {
            cast: Some(true),
            receive: Some(true),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cast.is_none() && self.receive.is_none()
    }
}

/// Sets shadow flags on every node of a loaded asset.
pub struct ShadowFlagger;

impl ShadowFlagger {
    /// Visits the whole tree under `asset.root()` and writes the requested
    /// flags onto every node. Returns the number of visited nodes.
    pub fn flag(asset: &mut ModelAsset, flags: ShadowFlags) -> usize {
        let order = Self::visit_order(asset);
        for &key in &order {
            if let Some(node) = asset.node_mut(key) {
                if let Some(cast) = flags.cast {
                    node.cast_shadow = cast;
                }
                if let Some(receive) = flags.receive {
                    node.receive_shadow = receive;
                }
            }
        }
        log::debug!("Flagged shadows on {} nodes of {}", order.len(), asset.url());
        order.len()
    }

    /// Pre-order sequence of the tree, children in declaration order.
    #[must_use]
    pub fn visit_order(asset: &ModelAsset) -> Vec<AssetNodeKey> {
        let mut order = Vec::with_capacity(asset.node_count());
        let mut stack = vec![asset.root()];

        while let Some(key) = stack.pop() {
            let Some(node) = asset.node(key) else {
                continue;
            };
            order.push(key);
            stack.extend(node.children().iter().rev().copied());
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::model::AssetNode;
    use crate::resources::material::Material;

    fn house() -> ModelAsset {
        let mut asset = ModelAsset::new("house.glb", AssetNode::new("House"));
        let root = asset.root();
        let walls = asset.add_child(root, AssetNode::new("Walls")).unwrap();
        asset.add_child(walls, AssetNode::new("Door")).unwrap();
        asset.add_child(root, AssetNode::new("Roof")).unwrap();
        asset.insert_material(Material::new("window"));
        asset.insert_material(Material::new("brick"));
        asset
    }

    #[test]
    fn visit_order_is_preorder() {
        let asset = house();
        let names: Vec<_> = ShadowFlagger::visit_order(&asset)
            .into_iter()
            .map(|k| asset.node(k).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["House", "Walls", "Door", "Roof"]);
    }

    #[test]
    fn partial_flags_leave_other_flag_alone() {
        let mut asset = house();
        let count = ShadowFlagger::flag(
            &mut asset,
            ShadowFlags {
                cast: Some(true),
                receive: None,
            },
        );
        assert_eq!(count, 4);
        assert!(asset.nodes.values().all(|n| n.cast_shadow && !n.receive_shadow));
    }

    #[test]
    fn unknown_material_is_reported() {
        let mut asset = house();
        let before = asset.materials.clone();
        let err = MaterialTuner::tune(&mut asset, "glass", &MaterialOverrides::glass()).unwrap_err();
        assert!(matches!(
            err,
            Error::MaterialNotFound { ref asset, ref material } if asset == "house.glb" && material == "glass"
        ));
        assert_eq!(asset.materials, before);
    }
}

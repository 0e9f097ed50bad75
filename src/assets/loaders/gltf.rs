//! glTF 2.0 / GLB structural decoder.
//!
//! Reads what scene composition needs: the default scene's node hierarchy
//! (names, TRS, per-primitive materials) and the material table. Vertex and
//! image payloads are left to the renderer.

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::assets::model::{AssetNode, AssetNodeKey, ModelAsset};
use crate::errors::{Error, Result};
use crate::resources::color::Color;
use crate::resources::material::{AlphaMode, Material};
use crate::scene::transform::Transform;

/// Material name used for primitives without an explicit material.
pub const DEFAULT_MATERIAL: &str = "default";

/// Name of the synthetic root grouping several top-level nodes.
pub const SYNTHETIC_ROOT: &str = "gltf_root";

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "KHR_materials_emissive_strength",
    "KHR_materials_ior",
    "KHR_materials_transmission",
    "KHR_materials_volume",
];

pub struct GltfLoader;

impl GltfLoader {
    /// Decodes a `.gltf` (JSON) or `.glb` document held in memory.
    pub fn decode(url: &str, bytes: &[u8]) -> Result<ModelAsset> {
        let gltf = gltf::Gltf::from_slice(bytes)
            .map_err(|e| Error::asset_load(url, format!("glTF parse error: {e}")))?;

        Self::report_extensions(url, &gltf);

        let material_names = Self::material_names(&gltf);
        let top_level = Self::top_level_nodes(&gltf);

        let (mut asset, pending) = match top_level.as_slice() {
            [] => {
                return Err(Error::asset_load(url, "document has no nodes"));
            }
            [single] => {
                let asset = ModelAsset::new(url, Self::convert_node(single, &material_names));
                let root = asset.root();
                let pending: Vec<_> = single.children().map(|c| (c, root)).collect();
                (asset, pending)
            }
            many => {
                let asset = ModelAsset::new(url, AssetNode::new(SYNTHETIC_ROOT));
                let root = asset.root();
                let pending: Vec<_> = many.iter().cloned().map(|n| (n, root)).collect();
                (asset, pending)
            }
        };

        Self::load_materials(&gltf, &material_names, &mut asset);

        let mut visited = FxHashSet::default();
        if let [single] = top_level.as_slice() {
            visited.insert(single.index());
        }

        // Depth-first; siblings are pushed reversed so they are created in
        // declaration order.
        let mut stack: Vec<(gltf::Node, AssetNodeKey)> = pending.into_iter().rev().collect();
        while let Some((node, parent)) = stack.pop() {
            if !visited.insert(node.index()) {
                log::warn!("{url}: node {} is referenced more than once, skipping", node.index());
                continue;
            }
            let Some(key) = asset.add_child(parent, Self::convert_node(&node, &material_names)) else {
                continue;
            };
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, key));
            }
        }

        if asset
            .nodes
            .values()
            .any(|n| n.materials.iter().any(|m| m == DEFAULT_MATERIAL))
            && asset.material(DEFAULT_MATERIAL).is_none()
        {
            asset.insert_material(Material::new(DEFAULT_MATERIAL));
        }

        log::debug!(
            "Decoded {url}: {} nodes, {} materials",
            asset.node_count(),
            asset.materials.len()
        );

        Ok(asset)
    }

    fn report_extensions(url: &str, gltf: &gltf::Gltf) {
        let required: Vec<_> = gltf
            .extensions_required()
            .filter(|ext| !SUPPORTED_EXTENSIONS.contains(ext))
            .collect();
        if !required.is_empty() {
            log::warn!("{url} requires unsupported extensions: {required:?}");
        }
    }

    /// Nodes of the default scene (or the first scene). Without any scene,
    /// every node that is nobody's child.
    fn top_level_nodes(gltf: &gltf::Gltf) -> Vec<gltf::Node<'_>> {
        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            return scene.nodes().collect();
        }

        let children: FxHashSet<usize> = gltf
            .nodes()
            .flat_map(|n| n.children().map(|c| c.index()).collect::<Vec<_>>())
            .collect();
        gltf.nodes().filter(|n| !children.contains(&n.index())).collect()
    }

    /// Unique names per material index. Unnamed materials become
    /// `material_<index>`; a repeated name gets the index appended.
    fn material_names(gltf: &gltf::Gltf) -> Vec<String> {
        let mut taken = FxHashSet::default();
        gltf.materials()
            .enumerate()
            .map(|(i, material)| {
                let mut name = material
                    .name()
                    .map_or_else(|| format!("material_{i}"), str::to_string);
                if !taken.insert(name.clone()) {
                    name = format!("{name}_{i}");
                    taken.insert(name.clone());
                }
                name
            })
            .collect()
    }

    fn load_materials(gltf: &gltf::Gltf, names: &[String], asset: &mut ModelAsset) {
        for (material, name) in gltf.materials().zip(names) {
            let pbr = material.pbr_metallic_roughness();
            let [r, g, b, a] = pbr.base_color_factor();

            let mut mat = Material::new(name.clone());
            mat.color = Color::rgb(r, g, b);
            mat.opacity = a;
            mat.metalness = pbr.metallic_factor();
            mat.roughness = pbr.roughness_factor();
            mat.emissive = Color(Vec3::from_array(material.emissive_factor()));

            mat.alpha_mode = match material.alpha_mode() {
                gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
                gltf::material::AlphaMode::Mask => AlphaMode::Mask,
                gltf::material::AlphaMode::Blend => AlphaMode::Blend,
            };
            mat.transparent = mat.alpha_mode == AlphaMode::Blend;

            //=========================Material Extensions=========================//
            if let Some(strength) = material.emissive_strength() {
                mat.emissive_intensity = strength;
            }
            if let Some(ior) = material.ior() {
                mat.ior = ior;
            }
            if let Some(transmission) = material.transmission() {
                mat.transmission = transmission.transmission_factor();
            }
            if let Some(volume) = material.volume() {
                mat.thickness = volume.thickness_factor();
            }

            asset.insert_material(mat);
        }
    }

    fn convert_node(node: &gltf::Node, material_names: &[String]) -> AssetNode {
        let name = node
            .name()
            .map_or_else(|| format!("node_{}", node.index()), str::to_string);
        let mut asset_node = AssetNode::new(name);

        let (t, r, s) = node.transform().decomposed();
        asset_node.transform = Transform::from_trs(t, r, s);

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                let material = primitive
                    .material()
                    .index()
                    .and_then(|i| material_names.get(i))
                    .map_or(DEFAULT_MATERIAL, String::as_str);
                if !asset_node.materials.iter().any(|m| m == material) {
                    asset_node.materials.push(material.to_string());
                }
            }
        }

        asset_node
    }
}

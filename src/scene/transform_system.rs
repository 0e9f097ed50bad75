//! Transform system
//!
//! Propagates local transforms into world matrices for the whole node tree.
//! Kept separate from [`Scene`](crate::scene::Scene) so it only borrows the
//! node arena and the camera pool.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::{CameraKey, NodeKey};

/// Iterative depth-first update; no recursion so deep hierarchies cannot
/// overflow the stack.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeKey, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    roots: &[NodeKey],
) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeKey, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((key, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(key) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_changed = local_changed || parent_changed;

        if world_changed {
            let new_world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);

            if let Some(camera) = node.camera.and_then(|c| cameras.get_mut(c)) {
                camera.update_view_projection(&new_world);
            }
        }

        let current_world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_changed));
        }
    }
}

/// World matrix of `key` composed from its ancestor chain, without touching
/// the caches. `None` if the node or one of its ancestors is missing.
#[must_use]
pub fn compute_world_matrix(nodes: &SlotMap<NodeKey, Node>, key: NodeKey) -> Option<Affine3A> {
    let mut matrix = Affine3A::IDENTITY;
    let mut current = Some(key);
    let mut guard = 0usize;

    while let Some(k) = current {
        let node = nodes.get(k)?;
        matrix = node.transform.compute_local_matrix() * matrix;
        current = node.parent;

        guard += 1;
        if guard > nodes.len() {
            log::error!("Cycle detected in node hierarchy");
            return None;
        }
    }

    Some(matrix)
}

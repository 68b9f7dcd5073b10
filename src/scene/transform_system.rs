//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices. Kept apart
//! from [`Scene`](crate::scene::Scene) so it only borrows the node and camera
//! pools, which avoids borrow conflicts with the rest of the scene.
//!
//! Both entry points walk the tree with an explicit stack, so deep hierarchies
//! cannot overflow the call stack.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::{CameraKey, NodeHandle};

/// Updates the world matrices of every node reachable from `roots`.
///
/// Nodes whose local matrix and parent are unchanged keep their cached world
/// matrix.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    roots: &[NodeHandle],
) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    propagate(nodes, cameras, &mut stack);
}

/// Updates the world matrices of `root` and its descendants.
///
/// The subtree root is always recomputed against its parent's cached world
/// matrix, so this is the call to make after editing one node directly.
pub fn update_subtree(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    root: NodeHandle,
) {
    let Some(node) = nodes.get(root) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root, parent_world, true)];
    propagate(nodes, cameras, &mut stack);
}

fn propagate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    stack: &mut Vec<(NodeHandle, Affine3A, bool)>,
) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_changed = local_changed || parent_changed;

        if world_changed {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);

            if let Some(camera_key) = node.camera
                && let Some(camera) = cameras.get_mut(camera_key)
            {
                camera.update_view_projection(&new_world);
            }
        }

        let current_world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_changed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let mut cameras: SlotMap<CameraKey, Camera> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes[parent_handle].children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &mut cameras, &[parent_handle]);

        let child_world_pos = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn subtree_update_uses_cached_parent_world() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let mut cameras: SlotMap<CameraKey, Camera> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(0.0, 0.0, 5.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);
        nodes[parent_handle].children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &mut cameras, &[parent_handle]);

        nodes[child_handle].transform.position = Vec3::new(2.0, 0.0, 0.0);
        update_subtree(&mut nodes, &mut cameras, child_handle);

        let pos: Vec3 = nodes[child_handle].transform.world_matrix.translation.into();
        assert!((pos - Vec3::new(2.0, 0.0, 5.0)).length() < 1e-5);
    }
}

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::scene::bounds::{BoundingBox, BoundingSphere};
use crate::scene::camera::Camera;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{CameraKey, MaterialKey, MeshKey, NodeHandle};

/// Scene graph.
///
/// Pure data: the node arena, the root list and the component pools. World
/// matrices are cached on each node's [`Transform`]; the `set_world_*` and
/// `attach_keep_world` helpers keep the touched subtree current, anything else
/// needs [`Scene::update_matrix_world`] afterwards.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub materials: SlotMap<MaterialKey, Material>,
    pub cameras: SlotMap<CameraKey, Camera>,
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
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Inserts a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Parent of `handle`: `Some(None)` for a root node, `None` if the node
    /// does not exist.
    #[must_use]
    pub fn parent_of(&self, handle: NodeHandle) -> Option<Option<NodeHandle>> {
        self.nodes.get(handle).map(|n| n.parent)
    }

    /// Whether `ancestor` appears on the parent chain of `handle`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, handle: NodeHandle) -> bool {
        let mut cursor = self.nodes.get(handle).and_then(|n| n.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Makes `child` a child of `parent`. The child keeps its local transform.
    ///
    /// Returns `false` (and leaves the hierarchy untouched) if either node is
    /// missing or the attachment would create a cycle.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> bool {
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Cannot attach {child:?} below itself");
            return false;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Node not found during attach: {child:?} -> {parent:?}");
            return false;
        }

        self.unlink(child);
        self.nodes[parent].children.push(child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
        true
    }

    /// Moves `child` to the root level. The child keeps its local transform.
    pub fn detach(&mut self, child: NodeHandle) {
        if !self.nodes.contains_key(child) {
            return;
        }
        self.unlink(child);
        self.root_nodes.push(child);

        let node = &mut self.nodes[child];
        node.parent = None;
        node.transform.mark_dirty();
    }

    /// Reparents `child` (to the root level for `None`) while preserving its
    /// world transform.
    pub fn attach_keep_world(&mut self, child: NodeHandle, parent: Option<NodeHandle>) -> bool {
        let Some(world) = self.world_matrix(child) else {
            return false;
        };

        match parent {
            Some(parent) => {
                if !self.attach(child, parent) {
                    return false;
                }
            }
            None => self.detach(child),
        }

        self.set_world_matrix(child, world)
    }

    fn unlink(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(i) = parent.children.iter().position(|&x| x == child)
            {
                parent.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }
    }

    /// Removes a node and its whole subtree, together with the mesh and camera
    /// components they own. Materials are shared and stay in the pool.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(mesh) = node.mesh {
                self.meshes.remove(mesh);
            }
            if let Some(camera) = node.camera {
                self.cameras.remove(camera);
            }
            stack.extend(node.children);
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Visits every node depth-first, roots in insertion order.
    pub fn traverse(&self, mut visitor: impl FnMut(NodeHandle, &Node)) {
        self.traverse_pruned(|handle, node| {
            visitor(handle, node);
            true
        });
    }

    /// Depth-first visit where the visitor decides whether to descend into
    /// the node's children.
    pub fn traverse_pruned(&self, mut visitor: impl FnMut(NodeHandle, &Node) -> bool) {
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if visitor(handle, node) {
                stack.extend(node.children.iter().rev());
            }
        }
    }

    /// Visits `root` and its descendants depth-first.
    pub fn traverse_from(&self, root: NodeHandle, mut visitor: impl FnMut(NodeHandle, &Node)) {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visitor(handle, node);
            stack.extend(node.children.iter().rev());
        }
    }

    // ========================================================================
    // Matrix pipeline
    // ========================================================================

    /// Refreshes every world matrix in the scene.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(
            &mut self.nodes,
            &mut self.cameras,
            &self.root_nodes,
        );
    }

    /// Refreshes the world matrices of one subtree.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, &mut self.cameras, root);
    }

    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        self.nodes.get(handle).map(|n| n.transform.world_matrix)
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| m.translation.into())
    }

    fn parent_world(&self, handle: NodeHandle) -> Affine3A {
        self.nodes
            .get(handle)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix)
    }

    /// Moves a node so its world-space origin lands on `position`, leaving
    /// rotation and scale untouched.
    pub fn set_world_position(&mut self, handle: NodeHandle, position: Vec3) -> bool {
        if !self.nodes.contains_key(handle) {
            return false;
        }
        let local = self.parent_world(handle).inverse().transform_point3(position);
        self.nodes[handle].transform.position = local;
        self.update_subtree(handle);
        true
    }

    /// Sets the local transform so that the node's world matrix equals `world`
    /// under its current parent.
    pub fn set_world_matrix(&mut self, handle: NodeHandle, world: Affine3A) -> bool {
        if !self.nodes.contains_key(handle) {
            return false;
        }
        let local = self.parent_world(handle).inverse() * world;
        self.nodes[handle].transform.apply_local_matrix(local);
        self.update_subtree(handle);
        true
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Inserts a root node carrying `mesh`.
    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeHandle {
        let mut node = Node::with_name(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_node(node)
    }

    pub fn add_mesh_to_parent(&mut self, mesh: Mesh, parent: NodeHandle) -> NodeHandle {
        let mut node = Node::with_name(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_to_parent(node, parent)
    }

    /// Inserts a root node carrying `camera`.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let mut node = Node::with_name(&camera.name);
        node.camera = Some(self.cameras.insert(camera));
        self.add_node(node)
    }

    /// Returns the (Transform, Camera) pair of a camera node.
    pub fn query_camera_bundle(
        &mut self,
        handle: NodeHandle,
    ) -> Option<(&mut Transform, &mut Camera)> {
        let camera_key = self.nodes.get(handle)?.camera?;
        let camera = self.cameras.get_mut(camera_key)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn camera_of(&self, handle: NodeHandle) -> Option<&Camera> {
        let key = self.nodes.get(handle)?.camera?;
        self.cameras.get(key)
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    fn world_box_of_one_node(&self, handle: NodeHandle) -> Option<BoundingBox> {
        let node = self.nodes.get(handle)?;
        let mesh = self.meshes.get(node.mesh?)?;
        Some(mesh.bounds.transform(&node.transform.world_matrix))
    }

    /// World-space bounds of a node's meshes and its descendants' meshes.
    #[must_use]
    pub fn world_bounding_box(&self, handle: NodeHandle) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        self.traverse_from(handle, |current, _| {
            if let Some(bbox) = self.world_box_of_one_node(current) {
                combined = Some(match combined {
                    Some(existing) => existing.union(&bbox),
                    None => bbox,
                });
            }
        });
        combined
    }

    #[must_use]
    pub fn world_bounding_sphere(&self, handle: NodeHandle) -> Option<BoundingSphere> {
        self.world_bounding_box(handle).map(|b| b.bounding_sphere())
    }
}

/// Chained node construction, see [`Scene::build_node`].
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::with_name(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: glam::Quat) -> Self {
        self.node.transform.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Attaches a mesh built from local bounds and one material.
    #[must_use]
    pub fn with_mesh(mut self, bounds: BoundingBox, material: MaterialKey) -> Self {
        let mesh = Mesh::new(&self.node.name, bounds, material);
        self.node.mesh = Some(self.scene.meshes.insert(mesh));
        self
    }

    /// Inserts the node and returns its handle.
    pub fn build(self) -> NodeHandle {
        let handle = self.scene.add_node(self.node);
        if let Some(parent) = self.parent {
            self.scene.attach(handle, parent);
        }
        handle
    }
}

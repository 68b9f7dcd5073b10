//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - World-space editing: set_world_position, set_world_matrix, attach_keep_world
//! - Traversal order and pruning
//! - Mesh bounds in world space
//! - OrbitControls driving a camera transform

use glam::{Affine3A, Quat, Vec3};
use myth_exploder::scene::{BoundingBox, BoundingSphere, Camera, Material, Mesh, Scene};
use myth_exploder::scene::transform::Transform;
use myth_exploder::utils::OrbitControls;
use std::f32::consts::FRAC_PI_2;

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_create_node() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("TestNode");
    assert!(scene.contains(handle));
    assert_eq!(scene.get_node(handle).map(|n| n.name.as_str()), Some("TestNode"));
    assert_eq!(scene.parent_of(handle), Some(None));
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_remove_node_removes_subtree_and_components() {
    let mut scene = Scene::new();
    let material = scene.add_material(Material::default());
    let parent = scene.create_node();
    let child = scene
        .build_node("child")
        .with_parent(parent)
        .with_mesh(BoundingBox::from_half_extents(Vec3::ONE), material)
        .build();

    scene.remove_node(parent);
    assert!(!scene.contains(parent));
    assert!(!scene.contains(child));
    assert!(scene.meshes.is_empty());
    assert!(scene.materials.contains_key(material));
    assert!(scene.root_nodes.is_empty());
    assert_eq!(scene.parent_of(child), None);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_moves_between_parents() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let b = scene.create_node();
    let child = scene.create_node();

    assert!(scene.attach(child, a));
    assert!(scene.attach(child, b));
    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));

    scene.detach(child);
    assert_eq!(scene.parent_of(child), Some(None));
    assert!(scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_rejects_cycles() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let b = scene.create_node();
    assert!(scene.attach(b, a));

    assert!(!scene.attach(a, b));
    assert!(!scene.attach(a, a));
    assert_eq!(scene.parent_of(a), Some(None));
    assert!(scene.is_ancestor(a, b));
}

#[test]
fn attach_keep_world_preserves_world_transform() {
    let mut scene = Scene::new();
    let parent = scene
        .build_node("parent")
        .with_position(3.0, 0.0, 0.0)
        .with_rotation(Quat::from_rotation_y(FRAC_PI_2))
        .with_scale(2.0)
        .build();
    let child = scene
        .build_node("child")
        .with_parent(parent)
        .with_position(1.0, 1.0, 0.0)
        .build();
    scene.update_matrix_world();
    let world = scene.world_matrix(child).unwrap();

    assert!(scene.attach_keep_world(child, None));
    assert_eq!(scene.parent_of(child), Some(None));
    assert!(scene.world_matrix(child).unwrap().abs_diff_eq(world, EPSILON));

    assert!(scene.attach_keep_world(child, Some(parent)));
    assert_eq!(scene.parent_of(child), Some(Some(parent)));
    scene.update_matrix_world();
    assert!(scene.world_matrix(child).unwrap().abs_diff_eq(world, EPSILON));
}

#[test]
fn set_world_position_under_transformed_parent() {
    let mut scene = Scene::new();
    let parent = scene
        .build_node("parent")
        .with_position(0.0, 10.0, 0.0)
        .with_scale(0.5)
        .build();
    let child = scene.build_node("child").with_parent(parent).build();
    let grandchild = scene
        .build_node("grandchild")
        .with_parent(child)
        .with_position(2.0, 0.0, 0.0)
        .build();
    scene.update_matrix_world();

    assert!(scene.set_world_position(child, Vec3::new(4.0, 4.0, 4.0)));
    assert!(vec3_approx(scene.world_position(child).unwrap(), Vec3::new(4.0, 4.0, 4.0)));
    // Descendants follow right away.
    assert!(vec3_approx(
        scene.world_position(grandchild).unwrap(),
        Vec3::new(5.0, 4.0, 4.0)
    ));
}

#[test]
fn set_world_matrix_round_trips() {
    let mut scene = Scene::new();
    let parent = scene
        .build_node("parent")
        .with_rotation(Quat::from_rotation_z(0.4))
        .with_position(1.0, 2.0, 3.0)
        .build();
    let child = scene.build_node("child").with_parent(parent).build();
    scene.update_matrix_world();

    let target = Affine3A::from_scale_rotation_translation(
        Vec3::splat(1.5),
        Quat::from_rotation_x(0.7),
        Vec3::new(-2.0, 0.5, 9.0),
    );
    assert!(scene.set_world_matrix(child, target));
    scene.update_matrix_world();
    assert!(scene.world_matrix(child).unwrap().abs_diff_eq(target, EPSILON));
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn traverse_is_depth_first_in_insertion_order() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let a1 = scene.build_node("a1").with_parent(a).build();
    let a2 = scene.build_node("a2").with_parent(a).build();
    let b = scene.create_node();

    let mut order = Vec::new();
    scene.traverse(|handle, _| order.push(handle));
    assert_eq!(order, vec![a, a1, a2, b]);

    let mut pruned = Vec::new();
    scene.traverse_pruned(|handle, _| {
        pruned.push(handle);
        handle != a
    });
    assert_eq!(pruned, vec![a, b]);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn world_bounds_cover_descendant_meshes() {
    let mut scene = Scene::new();
    let material = scene.add_material(Material::default());
    let holder = scene.build_node("holder").with_position(10.0, 0.0, 0.0).build();
    scene.add_mesh_to_parent(
        Mesh::new("left", BoundingBox::from_half_extents(Vec3::ONE), material),
        holder,
    );
    let right = scene.add_mesh_to_parent(
        Mesh::new("right", BoundingBox::from_half_extents(Vec3::ONE), material),
        holder,
    );
    if let Some(node) = scene.get_node_mut(right) {
        node.transform.position = Vec3::new(4.0, 0.0, 0.0);
    }
    scene.update_matrix_world();

    let bounds = scene.world_bounding_box(holder).unwrap();
    assert!(vec3_approx(bounds.min, Vec3::new(9.0, -1.0, -1.0)));
    assert!(vec3_approx(bounds.max, Vec3::new(15.0, 1.0, 1.0)));

    let sphere = scene.world_bounding_sphere(holder).unwrap();
    assert!(vec3_approx(sphere.center, Vec3::new(12.0, 0.0, 0.0)));
    let empty = scene.create_node();
    assert!(scene.world_bounding_sphere(empty).is_none());
}

#[test]
fn enclosing_sphere_reaches_every_member() {
    let spheres = [(Vec3::new(-2.0, 0.0, 0.0), 1.0), (Vec3::new(4.0, 0.0, 0.0), 0.5)];
    let sphere = BoundingSphere::enclosing(&spheres).unwrap();
    assert!(vec3_approx(sphere.center, Vec3::new(1.0, 0.0, 0.0)));
    assert!((sphere.radius - 4.0).abs() < EPSILON);
    assert!(BoundingSphere::enclosing(&[]).is_none());
}

// ============================================================================
// Cameras & Controls
// ============================================================================

#[test]
fn camera_frameability() {
    assert!(Camera::new_perspective(60.0, 1.5, 0.1, 100.0).is_frameable());
    assert!(!Camera::new_perspective(0.0, 1.5, 0.1, 100.0).is_frameable());
    assert!(!Camera::new_perspective(60.0, f32::NAN, 0.1, 100.0).is_frameable());
}

#[test]
fn orbit_controls_keep_distance_and_face_target() {
    let mut controls = OrbitControls::new(Vec3::new(1.0, 0.0, 0.0));
    let mut transform = Transform::from_position(Vec3::new(1.0, 0.0, 10.0));

    controls.update(&mut transform);
    assert!(vec3_approx(transform.position, Vec3::new(1.0, 0.0, 10.0)));
    let forward = transform.rotation * Vec3::NEG_Z;
    assert!(vec3_approx(forward, Vec3::NEG_Z));

    controls.rotate(FRAC_PI_2, 0.0);
    controls.update(&mut transform);
    assert!((transform.position.distance(controls.target) - 10.0).abs() < EPSILON);
    assert!(vec3_approx(transform.position, Vec3::new(11.0, 0.0, 0.0)));

    controls.dolly(0.5);
    controls.update(&mut transform);
    assert!((transform.position.distance(controls.target) - 5.0).abs() < EPSILON);
}

//! Scene Graph Module
//!
//! A small retained scene graph the animator operates on:
//! - [`Node`]: hierarchy entry (parent, children, transform, components)
//! - [`Transform`]: TRS with cached local and world matrices
//! - [`Scene`]: node arena plus mesh, material and camera pools
//! - [`Camera`]: perspective camera component
//! - [`transform_system`]: hierarchy matrix propagation, decoupled from `Scene`

pub mod bounds;
pub mod camera;
pub mod material;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use bounds::{BoundingBox, BoundingSphere};
pub use camera::Camera;
pub use material::Material;
pub use mesh::Mesh;
pub use node::Node;
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct MaterialKey;
    pub struct CameraKey;
}

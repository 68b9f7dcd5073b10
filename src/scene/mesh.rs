use smallvec::SmallVec;

use crate::scene::MaterialKey;
use crate::scene::bounds::BoundingBox;

/// Renderable component: local-space bounds plus the materials it draws with.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    /// Local-space bounds of the geometry
    pub bounds: BoundingBox,
    pub materials: SmallVec<[MaterialKey; 1]>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, bounds: BoundingBox, material: MaterialKey) -> Self {
        let mut materials = SmallVec::new();
        materials.push(material);
        Self {
            name: name.to_string(),
            bounds,
            materials,
        }
    }

    /// Adds another material slot (multi-material meshes).
    #[must_use]
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.materials.push(material);
        self
    }
}

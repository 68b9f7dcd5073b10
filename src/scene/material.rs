use glam::Vec4;
use std::borrow::Cow;

/// Surface appearance shared between meshes.
///
/// Only the blending state the animator touches is modelled; a material is
/// referenced by [`MaterialKey`](crate::scene::MaterialKey) so several meshes
/// can share one.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Cow<'static, str>,
    pub color: Vec4,
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            color: Vec4::ONE,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    #[must_use]
    pub fn with_depth_write(mut self, enabled: bool) -> Self {
        self.depth_write = enabled;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Material")
    }
}

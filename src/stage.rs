//! Stage
//!
//! Everything an animator works against, bundled so it can be borrowed as one:
//! the scene, the node carrying the viewing camera, optional orbit controls
//! and the material dimming registry. Several animators driving the same stage
//! share the registry, which is what makes their dimming reference counted.

use crate::explode::dimming::MaterialDimRegistry;
use crate::scene::{NodeHandle, Scene};
use crate::utils::OrbitControls;

pub struct Stage {
    pub scene: Scene,
    /// Node carrying the viewing camera; expected at the root level
    pub camera: NodeHandle,
    pub controls: Option<OrbitControls>,
    pub dimming: MaterialDimRegistry,
}

impl Stage {
    #[must_use]
    pub fn new(scene: Scene, camera: NodeHandle) -> Self {
        Self {
            scene,
            camera,
            controls: None,
            dimming: MaterialDimRegistry::new(),
        }
    }

    #[must_use]
    pub fn with_controls(mut self, controls: OrbitControls) -> Self {
        self.controls = Some(controls);
        self
    }
}

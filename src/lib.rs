#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Disassembly ("explode") animation for a retained scene graph.
//!
//! A [`GroupExploder`] spreads a set of scene nodes into a ring, spiral, grid
//! or radial layout, reframes the camera around the result and dims the rest
//! of the scene; `restore` reverses all of it. The crate carries the small
//! scene graph, camera and orbit controls it animates.

pub mod animation;
pub mod errors;
pub mod explode;
pub mod scene;
pub mod stage;
pub mod utils;

pub use animation::{Completion, FrameHandle, Outcome};
pub use errors::{ExplodeError, Result};
pub use explode::{
    ArrangementMode, DimOptions, ExplodeOptions, ExploderPhase, GroupExploder, LoopKind,
    MaterialDimRegistry, SetMeshesOptions,
};
pub use scene::{BoundingBox, BoundingSphere, Camera, Material, Mesh, Node, NodeHandle, Scene};
pub use stage::Stage;
pub use utils::OrbitControls;

//! Animation Primitives
//!
//! - [`easing`]: timing curves
//! - [`frame`]: frame-driven phases and the single-occupancy loop slot
//! - [`completion`]: futures settled when a multi-frame operation ends

pub mod completion;
pub mod easing;
pub mod frame;

pub use completion::{Completion, Outcome};
pub use easing::ease_in_out_quad;
pub use frame::{FrameHandle, FrameSlot, Timeline, Tween};

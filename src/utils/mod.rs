//! Utility Module
//!
//! - [`OrbitControls`]: orbit camera controller with a mutable look-at target
//! - [`time`]: platform-appropriate `Instant` / `Duration`

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;

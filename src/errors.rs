//! Error Types
//!
//! This module defines the error type returned by the animator.
//!
//! # Overview
//!
//! Almost everything the animator does is lenient: empty sets are no-ops,
//! missing snapshots fall back, and malformed objects are skipped. The only
//! conditions that surface as errors are the ones the animator cannot work
//! around, such as a viewing camera that does not exist or cannot be framed.
//!
//! ```rust,ignore
//! use myth_exploder::errors::{ExplodeError, Result};
//!
//! fn run(exploder: &mut GroupExploder, stage: &mut Stage) -> Result<()> {
//!     let _completion = exploder.explode(stage, &ExplodeOptions::default())?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeHandle;

/// The error type for the animator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplodeError {
    // ========================================================================
    // Camera Errors
    // ========================================================================
    /// The stage's camera node is not part of the scene.
    #[error("Camera node {0:?} is not in the scene")]
    CameraNotFound(NodeHandle),

    /// The camera node exists but carries no camera component.
    #[error("Node {0:?} has no camera component")]
    MissingCameraComponent(NodeHandle),

    /// The camera cannot be used for field-of-view framing.
    #[error("Camera cannot be framed: fov = {fov}, aspect = {aspect}")]
    InvalidCamera {
        /// Vertical field of view in radians
        fov: f32,
        /// Width / height ratio
        aspect: f32,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// An arrangement mode name did not match any known layout.
    #[error("Unknown arrangement mode: {0}")]
    UnknownArrangement(String),
}

/// Alias for `Result<T, ExplodeError>`.
pub type Result<T> = std::result::Result<T, ExplodeError>;

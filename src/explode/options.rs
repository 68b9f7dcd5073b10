//! Animator Options
//!
//! Plain configuration structs with public fields and sensible defaults:
//!
//! ```rust,ignore
//! let options = ExplodeOptions {
//!     mode: ArrangementMode::Grid,
//!     spacing: 3.0,
//!     ..Default::default()
//! };
//! ```
//!
//! All of them deserialize from JSON (durations in milliseconds), so a UI
//! layer can pass its settings straight through.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ExplodeError;

/// Default duration of an explicit [`restore`](crate::explode::GroupExploder::restore).
pub const DEFAULT_RESTORE_DURATION: Duration = Duration::from_millis(400);

/// Named layout used to compute explosion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrangementMode {
    /// Evenly spaced on one horizontal circle.
    Ring,
    /// Rising spiral whose radius grows with each part.
    #[default]
    Spiral,
    /// Square-ish horizontal grid.
    Grid,
    /// Three concentric rings, each lifted above the previous one.
    Radial,
}

impl ArrangementMode {
    pub const ALL: [ArrangementMode; 4] = [Self::Ring, Self::Spiral, Self::Grid, Self::Radial];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Spiral => "spiral",
            Self::Grid => "grid",
            Self::Radial => "radial",
        }
    }
}

impl fmt::Display for ArrangementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrangementMode {
    type Err = ExplodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExplodeError::UnknownArrangement(s.to_string()))
    }
}

/// Dimming of the parts that do not take part in an explosion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimOptions {
    pub enabled: bool,
    /// Opacity applied to the dimmed materials
    pub opacity: f32,
}

impl Default for DimOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.25,
        }
    }
}

/// Parameters of [`GroupExploder::explode`](crate::explode::GroupExploder::explode).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplodeOptions {
    pub mode: ArrangementMode,
    /// Added to the group's bounding radius to form the layout radius
    pub spacing: f32,
    /// Length of the object motion phase
    #[serde(with = "millis")]
    pub duration: Duration,
    /// Vertical lift, as a fraction of the layout radius
    pub lift: f32,
    /// Extra room around the exploded group when framing the camera
    pub camera_padding: f32,
    /// Length of the camera framing phase
    #[serde(with = "millis")]
    pub camera_duration: Duration,
    pub dim: DimOptions,
    /// Emit per-object progress messages to the debug hook
    pub debug: bool,
}

impl Default for ExplodeOptions {
    fn default() -> Self {
        Self {
            mode: ArrangementMode::Spiral,
            spacing: 2.0,
            duration: Duration::from_millis(1000),
            lift: 0.5,
            camera_padding: 1.5,
            camera_duration: Duration::from_millis(600),
            dim: DimOptions::default(),
            debug: false,
        }
    }
}

/// Parameters of [`GroupExploder::set_meshes`](crate::explode::GroupExploder::set_meshes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetMeshesOptions {
    /// Animate an exploded previous set back before adopting the new one
    pub auto_restore_prev: bool,
    #[serde(with = "millis")]
    pub restore_duration: Duration,
}

impl Default for SetMeshesOptions {
    fn default() -> Self {
        Self {
            auto_restore_prev: true,
            restore_duration: Duration::from_millis(300),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

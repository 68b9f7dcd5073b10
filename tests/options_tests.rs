//! Options Tests
//!
//! Tests for:
//! - Defaults of the animator options
//! - JSON configuration with partial objects and millisecond durations
//! - Arrangement mode parsing

use std::time::Duration;

use myth_exploder::explode::DEFAULT_RESTORE_DURATION;
use myth_exploder::{ArrangementMode, DimOptions, ExplodeError, ExplodeOptions, SetMeshesOptions};

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn explode_defaults() {
    let options = ExplodeOptions::default();
    assert_eq!(options.mode, ArrangementMode::Spiral);
    assert!((options.spacing - 2.0).abs() < f32::EPSILON);
    assert_eq!(options.duration, Duration::from_millis(1000));
    assert!((options.lift - 0.5).abs() < f32::EPSILON);
    assert!((options.camera_padding - 1.5).abs() < f32::EPSILON);
    assert_eq!(options.dim, DimOptions::default());
    assert!(options.dim.enabled);
    assert!((options.dim.opacity - 0.25).abs() < f32::EPSILON);
    assert!(!options.debug);
}

#[test]
fn set_meshes_and_restore_defaults() {
    let options = SetMeshesOptions::default();
    assert!(options.auto_restore_prev);
    assert_eq!(options.restore_duration, Duration::from_millis(300));
    assert_eq!(DEFAULT_RESTORE_DURATION, Duration::from_millis(400));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn partial_json_fills_defaults() {
    let options: ExplodeOptions =
        serde_json::from_str(r#"{ "mode": "grid", "duration": 250, "dim": { "opacity": 0.1 } }"#)
            .unwrap();

    assert_eq!(options.mode, ArrangementMode::Grid);
    assert_eq!(options.duration, Duration::from_millis(250));
    assert!(options.dim.enabled);
    assert!((options.dim.opacity - 0.1).abs() < f32::EPSILON);
    assert!((options.spacing - 2.0).abs() < f32::EPSILON);
    assert_eq!(options.camera_duration, ExplodeOptions::default().camera_duration);
}

#[test]
fn durations_serialize_as_milliseconds() {
    let options = SetMeshesOptions {
        auto_restore_prev: false,
        restore_duration: Duration::from_millis(1250),
    };
    let json = serde_json::to_value(options).unwrap();
    assert_eq!(json["restore_duration"], 1250);
    assert_eq!(json["auto_restore_prev"], false);

    let back: SetMeshesOptions = serde_json::from_value(json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn unknown_mode_in_json_is_rejected() {
    let result = serde_json::from_str::<ExplodeOptions>(r#"{ "mode": "hexagon" }"#);
    assert!(result.is_err());
}

// ============================================================================
// Arrangement Modes
// ============================================================================

#[test]
fn arrangement_mode_parses_case_insensitively() {
    for mode in ArrangementMode::ALL {
        assert_eq!(mode.as_str().parse::<ArrangementMode>(), Ok(mode));
        assert_eq!(mode.to_string().to_uppercase().parse::<ArrangementMode>(), Ok(mode));
    }
    assert_eq!(" radial ".parse::<ArrangementMode>(), Ok(ArrangementMode::Radial));
}

#[test]
fn arrangement_mode_rejects_unknown_names() {
    assert_eq!(
        "hexagon".parse::<ArrangementMode>(),
        Err(ExplodeError::UnknownArrangement("hexagon".to_string()))
    );
}

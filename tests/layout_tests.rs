//! Layout Tests
//!
//! Geometric checks of the four arrangement modes.

use glam::Vec3;
use myth_exploder::ArrangementMode;
use myth_exploder::explode::{MIN_RADIUS, compute_layout};

const EPSILON: f32 = 1e-4;

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

#[test]
fn ring_sits_on_one_circle_at_lift_height() {
    let center = Vec3::new(1.0, 2.0, 3.0);
    let targets = compute_layout(ArrangementMode::Ring, 8, center, 5.0, 0.75);
    for target in &targets {
        assert!((horizontal_distance(*target, center) - 5.0).abs() < EPSILON);
        assert!((target.y - 2.75).abs() < EPSILON);
    }
    // Evenly spaced: neighbours are equally far apart.
    let step = targets[0].distance(targets[1]);
    for pair in targets.windows(2) {
        assert!((pair[0].distance(pair[1]) - step).abs() < EPSILON);
    }
}

#[test]
fn spiral_grows_from_thirty_percent_to_full_radius() {
    let targets = compute_layout(ArrangementMode::Spiral, 7, Vec3::ZERO, 10.0, 4.0);
    let first = targets[0];
    let last = targets[6];
    assert!((horizontal_distance(first, Vec3::ZERO) - 3.0).abs() < EPSILON);
    assert!((horizontal_distance(last, Vec3::ZERO) - 10.0).abs() < EPSILON);
    assert!(first.y.abs() < EPSILON);
    assert!((last.y - 4.0).abs() < EPSILON);
    for pair in targets.windows(2) {
        assert!(pair[1].y > pair[0].y);
    }
}

#[test]
fn grid_is_centered_and_flat() {
    let center = Vec3::new(0.0, 1.0, 0.0);
    let targets = compute_layout(ArrangementMode::Grid, 4, center, 4.0, 0.5);
    // 2 x 2 grid, cell = 4 / 2
    let expected = [
        Vec3::new(-1.0, 1.5, -1.0),
        Vec3::new(1.0, 1.5, -1.0),
        Vec3::new(-1.0, 1.5, 1.0),
        Vec3::new(1.0, 1.5, 1.0),
    ];
    for (target, expected) in targets.iter().zip(expected) {
        assert!(target.distance(expected) < EPSILON, "{target} vs {expected}");
    }

    let odd = compute_layout(ArrangementMode::Grid, 5, Vec3::ZERO, 3.0, 0.0);
    let mean = odd.iter().copied().sum::<Vec3>() / odd.len() as f32;
    assert!(mean.y.abs() < EPSILON);
}

#[test]
fn radial_tiers_widen_and_rise() {
    let targets = compute_layout(ArrangementMode::Radial, 9, Vec3::ZERO, 10.0, 2.0);
    for (i, target) in targets.iter().enumerate() {
        let tier = (i % 3) as f32;
        let radius = 10.0 * (0.6 + 0.4 * tier);
        assert!((horizontal_distance(*target, Vec3::ZERO) - radius).abs() < EPSILON);
        assert!((target.y - 2.0 * (1.0 + 0.25 * tier)).abs() < EPSILON);
    }
}

#[test]
fn zero_radius_is_floored() {
    for mode in ArrangementMode::ALL {
        let targets = compute_layout(mode, 3, Vec3::ZERO, 0.0, 0.0);
        assert!(targets.iter().all(|t| t.is_finite()));
        assert!(targets.iter().any(|t| horizontal_distance(*t, Vec3::ZERO) > 0.0));
        assert!(targets.iter().all(|t| horizontal_distance(*t, Vec3::ZERO) <= MIN_RADIUS * 1.5));
    }
}

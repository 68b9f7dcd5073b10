//! Explosion layouts.
//!
//! Pure functions from a part count, the group center, a base radius and a
//! lift height to one target position per part. Inputs that would produce
//! degenerate placements are sanitized first: a non-finite center becomes the
//! origin, the radius is floored to [`MIN_RADIUS`], a non-finite lift is zero.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::explode::options::ArrangementMode;

/// Smallest radius a layout will use.
pub const MIN_RADIUS: f32 = 1e-3;

/// Parts per spiral turn.
const SPIRAL_PARTS_PER_TURN: usize = 6;

/// Computes `count` target positions for `mode`.
#[must_use]
pub fn compute_layout(
    mode: ArrangementMode,
    count: usize,
    center: Vec3,
    base_radius: f32,
    lift: f32,
) -> Vec<Vec3> {
    let center = if center.is_finite() { center } else { Vec3::ZERO };
    let radius = if base_radius.is_finite() {
        base_radius.max(MIN_RADIUS)
    } else {
        MIN_RADIUS
    };
    let lift = if lift.is_finite() { lift } else { 0.0 };

    match mode {
        ArrangementMode::Ring => ring(count, center, radius, lift),
        ArrangementMode::Spiral => spiral(count, center, radius, lift),
        ArrangementMode::Grid => grid(count, center, radius, lift),
        ArrangementMode::Radial => radial(count, center, radius, lift),
    }
}

fn ring(count: usize, center: Vec3, radius: f32, lift: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Vec3::new(
                center.x + angle.cos() * radius,
                center.y + lift,
                center.z + angle.sin() * radius,
            )
        })
        .collect()
}

fn spiral(count: usize, center: Vec3, radius: f32, lift: f32) -> Vec<Vec3> {
    let turns = count.div_ceil(SPIRAL_PARTS_PER_TURN).max(1) as f32;
    (0..count)
        .map(|i| {
            // Sweep progress; a lone part sits at the start of the spiral.
            let t = if count <= 1 {
                0.0
            } else {
                i as f32 / (count - 1) as f32
            };
            let angle = TAU * turns * t;
            let r = radius * (0.3 + 0.7 * t);
            Vec3::new(
                center.x + angle.cos() * r,
                center.y + lift * t,
                center.z + angle.sin() * r,
            )
        })
        .collect()
}

/// Square-ish grid, `cols = ceil(sqrt(n))`, cell `radius / max(cols, rows)`.
fn grid(count: usize, center: Vec3, radius: f32, lift: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let rows = count.div_ceil(cols);
    let cell = radius / cols.max(rows) as f32;

    let half_cols = (cols - 1) as f32 * 0.5;
    let half_rows = (rows - 1) as f32 * 0.5;

    (0..count)
        .map(|i| {
            let col = (i % cols) as f32;
            let row = (i / cols) as f32;
            Vec3::new(
                center.x + (col - half_cols) * cell,
                center.y + lift,
                center.z + (row - half_rows) * cell,
            )
        })
        .collect()
}

fn radial(count: usize, center: Vec3, radius: f32, lift: f32) -> Vec<Vec3> {
    const TIERS: usize = 3;
    (0..count)
        .map(|i| {
            let tier = i % TIERS;
            let slot = i / TIERS;
            // Number of parts sharing this tier.
            let in_tier = (count - tier).div_ceil(TIERS);

            let ring_radius = radius * (0.6 + 0.4 * tier as f32);
            let offset = tier as f32 * TAU / 12.0;
            let angle = offset + TAU * slot as f32 / in_tier as f32;
            Vec3::new(
                center.x + angle.cos() * ring_radius,
                center.y + lift * (1.0 + 0.25 * tier as f32),
                center.z + angle.sin() * ring_radius,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_yields_one_target_per_part() {
        for mode in ArrangementMode::ALL {
            for count in [0, 1, 2, 5, 13] {
                let targets = compute_layout(mode, count, Vec3::ZERO, 4.0, 1.0);
                assert_eq!(targets.len(), count, "{mode} with {count} parts");
                assert!(targets.iter().all(|p| p.is_finite()));
            }
        }
    }

    #[test]
    fn degenerate_inputs_are_sanitized() {
        let targets = compute_layout(ArrangementMode::Ring, 2, Vec3::NAN, 0.0, f32::NAN);
        assert!(targets.iter().all(|p| p.is_finite()));
        let r = Vec3::new(targets[0].x, 0.0, targets[0].z).length();
        assert!((r - MIN_RADIUS).abs() < 1e-6);
    }
}

//! Camera framing.
//!
//! Moves the camera back along its current viewing direction until a bounding
//! sphere fits the vertical field of view, then tweens position and look-at
//! target together.

use glam::Vec3;

use crate::animation::frame::Tween;
use crate::errors::{ExplodeError, Result};
use crate::explode::TweenCtx;
use crate::explode::layout::MIN_RADIUS;
use crate::scene::BoundingSphere;
use crate::stage::Stage;

/// View direction used when the camera sits on its target.
pub const FALLBACK_DIRECTION: Vec3 = Vec3::Z;

/// Camera placement: where it sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    #[must_use]
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// Distance at which a sphere of `radius` fits a vertical field of view of
/// `fov` radians, scaled by `padding`.
#[must_use]
pub fn fit_distance(radius: f32, padding: f32, fov: f32) -> f32 {
    let radius = if radius.is_finite() {
        radius.max(MIN_RADIUS)
    } else {
        MIN_RADIUS
    };
    let padding = if padding.is_finite() && padding > 0.0 {
        padding
    } else {
        1.0
    };
    radius * padding / (fov * 0.5).sin()
}

/// Pose that frames `sphere` while keeping the direction from `reference`
/// (the current look-at point) to `camera_position`.
#[must_use]
pub fn fit_pose(
    camera_position: Vec3,
    reference: Vec3,
    sphere: BoundingSphere,
    padding: f32,
    fov: f32,
) -> CameraPose {
    let offset = camera_position - reference;
    let direction = if offset.is_finite() && offset.length_squared() > 1e-12 {
        offset.normalize()
    } else {
        FALLBACK_DIRECTION
    };
    let center = if sphere.center.is_finite() {
        sphere.center
    } else {
        Vec3::ZERO
    };

    CameraPose {
        position: center + direction * fit_distance(sphere.radius, padding, fov),
        target: center,
    }
}

/// Vertical field of view of the stage camera, if it can be framed.
pub fn frameable_fov(stage: &Stage) -> Result<f32> {
    let node = stage
        .scene
        .get_node(stage.camera)
        .ok_or(ExplodeError::CameraNotFound(stage.camera))?;
    let camera = node
        .camera
        .and_then(|key| stage.scene.cameras.get(key))
        .ok_or(ExplodeError::MissingCameraComponent(stage.camera))?;

    if !camera.is_frameable() {
        return Err(ExplodeError::InvalidCamera {
            fov: camera.fov,
            aspect: camera.aspect,
        });
    }
    Ok(camera.fov)
}

/// Current pose of the stage camera. Without orbit controls the look-at point
/// is taken along the camera's forward axis, `focus_distance` away.
#[must_use]
pub fn current_pose(stage: &Stage, focus_distance: f32) -> Option<CameraPose> {
    let world = stage.scene.world_matrix(stage.camera)?;
    let position: Vec3 = world.translation.into();
    if !position.is_finite() {
        return None;
    }

    let target = match &stage.controls {
        Some(controls) => controls.target,
        None => {
            let forward = -Vec3::from(world.matrix3.z_axis).normalize_or_zero();
            position + forward * focus_distance
        }
    };
    target.is_finite().then_some(CameraPose { position, target })
}

/// Writes `pose` to the stage camera, runs the controls' update hook (or a
/// plain look-at) and refreshes the projection.
pub fn place_camera(stage: &mut Stage, pose: CameraPose) {
    let Stage {
        scene,
        camera,
        controls,
        ..
    } = stage;
    let camera = *camera;

    let Some(node) = scene.get_node_mut(camera) else {
        return;
    };
    node.transform.position = pose.position;
    match controls.as_mut() {
        Some(controls) => {
            controls.target = pose.target;
            controls.update(&mut node.transform);
        }
        None => node.transform.look_at(pose.target, Vec3::Y),
    }

    scene.update_subtree(camera);
    if let Some((_, cam)) = scene.query_camera_bundle(camera) {
        cam.update_projection_matrix();
    }
}

/// Frame-driven camera move toward a fitted pose.
pub(crate) struct CameraTween {
    from: Option<CameraPose>,
    to: CameraPose,
}

impl CameraTween {
    pub(crate) fn new(to: CameraPose) -> Self {
        Self { from: None, to }
    }
}

impl<'a> Tween<TweenCtx<'a>> for CameraTween {
    fn begin(&mut self, ctx: &mut TweenCtx<'a>) {
        let stage = &*ctx.stage;
        let focus = stage
            .scene
            .world_position(stage.camera)
            .map_or(1.0, |p| p.distance(self.to.target));
        self.from = current_pose(stage, focus);
        if self.from.is_none() {
            ctx.diag
                .warn(format_args!("Camera pose is not finite; jumping to the fitted pose"));
        }
    }

    fn apply(&mut self, ctx: &mut TweenCtx<'a>, t: f32) {
        let pose = match &self.from {
            Some(from) => from.lerp(&self.to, t),
            None => self.to,
        };
        place_camera(ctx.stage, pose);
    }

    fn finish(&mut self, ctx: &mut TweenCtx<'a>) {
        ctx.diag.debug(format_args!(
            "Camera framed at {} looking at {}",
            self.to.position, self.to.target
        ));
    }
}

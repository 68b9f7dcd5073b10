//! Object motion phase.
//!
//! Moves every member of a set in one frame loop. Exploding first lifts the
//! members to the scene root (keeping their world transform) so the targets can
//! be written in world space; restoring puts each member back under its
//! original parent once the motion has ended.

use glam::Vec3;

use crate::animation::frame::Tween;
use crate::explode::TweenCtx;
use crate::explode::diagnostics::Diagnostics;
use crate::explode::state::ExplosionState;
use crate::scene::{NodeHandle, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MotionKind {
    Explode,
    Restore,
}

/// One member's planned move, resolved against the scene when the loop begins.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlannedMove {
    pub node: NodeHandle,
    pub target: Vec3,
    pub snapshot: Option<ExplosionState>,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    node: NodeHandle,
    from: Vec3,
    to: Vec3,
    snapshot: Option<ExplosionState>,
}

pub(crate) struct MotionTween {
    kind: MotionKind,
    planned: Vec<PlannedMove>,
    tracks: Vec<Track>,
}

impl MotionTween {
    pub(crate) fn new(kind: MotionKind, planned: Vec<PlannedMove>) -> Self {
        Self {
            kind,
            planned,
            tracks: Vec::new(),
        }
    }

    /// Makes the node's world transform usable as a starting point. Returns
    /// `false` when the node has to sit this pass out.
    fn prepare(&self, scene: &mut Scene, mv: &PlannedMove, diag: &mut Diagnostics) -> bool {
        let world_is_finite = scene.world_matrix(mv.node).is_some_and(|m| m.is_finite());

        if world_is_finite {
            if self.kind == MotionKind::Explode && scene.parent_of(mv.node) != Some(None) {
                scene.attach_keep_world(mv.node, None);
            }
            return true;
        }

        let Some(snapshot) = mv.snapshot else {
            diag.warn(format_args!(
                "{:?} has a non-finite transform and no snapshot; skipping",
                mv.node
            ));
            return false;
        };
        diag.warn(format_args!(
            "{:?} has a non-finite transform; starting from its snapshot",
            mv.node
        ));
        if self.kind == MotionKind::Explode {
            scene.detach(mv.node);
        }
        scene.set_world_matrix(mv.node, snapshot.original_world);
        true
    }
}

impl<'a> Tween<TweenCtx<'a>> for MotionTween {
    fn begin(&mut self, ctx: &mut TweenCtx<'a>) {
        let planned = std::mem::take(&mut self.planned);
        let scene = &mut ctx.stage.scene;

        for mv in &planned {
            if !scene.contains(mv.node) {
                ctx.diag
                    .warn(format_args!("{:?} is no longer in the scene; skipping", mv.node));
                continue;
            }
            if !self.prepare(scene, mv, ctx.diag) {
                continue;
            }

            let Some(from) = scene.world_position(mv.node) else {
                continue;
            };
            let to = if mv.target.is_finite() {
                mv.target
            } else {
                ctx.diag
                    .warn(format_args!("{:?} has a non-finite target; holding it", mv.node));
                from
            };

            ctx.diag
                .detail(format_args!("{:?}: {from} -> {to}", mv.node));
            self.tracks.push(Track {
                node: mv.node,
                from,
                to,
                snapshot: mv.snapshot,
            });
        }

        ctx.diag.debug(format_args!(
            "{} motion started for {} objects",
            match self.kind {
                MotionKind::Explode => "Explode",
                MotionKind::Restore => "Restore",
            },
            self.tracks.len()
        ));
    }

    fn apply(&mut self, ctx: &mut TweenCtx<'a>, t: f32) {
        let scene = &mut ctx.stage.scene;
        for track in &self.tracks {
            scene.set_world_position(track.node, track.from.lerp(track.to, t));
        }
    }

    fn finish(&mut self, ctx: &mut TweenCtx<'a>) {
        if self.kind != MotionKind::Restore {
            return;
        }

        let scene = &mut ctx.stage.scene;
        scene.update_matrix_world();
        for track in &self.tracks {
            if let Some(snapshot) = track.snapshot {
                reinstate(scene, track.node, &snapshot, ctx.diag);
            }
        }
    }
}

/// Puts `node` back under its original parent with its original world
/// transform. A parent that has left the scene leaves the node at the root.
fn reinstate(scene: &mut Scene, node: NodeHandle, snapshot: &ExplosionState, diag: &mut Diagnostics) {
    if !scene.contains(node) {
        return;
    }

    let parent = match snapshot.original_parent {
        Some(parent) if !scene.contains(parent) => {
            diag.warn(format_args!(
                "Original parent {parent:?} of {node:?} is gone; leaving it at the root"
            ));
            None
        }
        other => other,
    };

    if scene.parent_of(node) != Some(parent) {
        match parent {
            Some(parent) => {
                if !scene.attach(node, parent) {
                    diag.warn(format_args!("Could not reattach {node:?} to {parent:?}"));
                }
            }
            None => scene.detach(node),
        }
    }

    scene.set_world_matrix(node, snapshot.original_world);
}

//! Disassembly Animator
//!
//! [`GroupExploder`] pulls a set of scene nodes apart into a readable layout and
//! puts them back again. An explosion runs in two strictly sequential phases:
//! the camera first reframes the space the parts will occupy, then every part
//! moves to its target in one shared frame loop. Parts outside the set are
//! dimmed through the stage's reference-counted [`MaterialDimRegistry`].
//!
//! # Driving
//!
//! Operations never block. They queue work and return a [`Completion`]; the
//! host advances the queue once per display frame:
//!
//! ```rust,ignore
//! let done = exploder.explode(&mut stage, &ExplodeOptions::default())?;
//! loop {
//!     exploder.update(&mut stage, Instant::now());
//!     // render ...
//! }
//! ```
//!
//! Starting an operation while another one is in flight cancels the older
//! work; its completion then settles with [`Outcome::Superseded`].
//!
//! [`Outcome::Superseded`]: crate::animation::Outcome::Superseded

pub mod camera_fit;
pub(crate) mod diagnostics;
pub mod dimming;
pub mod layout;
pub(crate) mod motion;
pub mod options;
pub mod state;

use std::collections::VecDeque;
use std::fmt;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::animation::completion::{self, Completion, Settler};
use crate::animation::frame::{self, FrameHandle, FrameSlot, Timeline};
use crate::errors::Result;
use crate::scene::{BoundingSphere, MaterialKey, NodeHandle};
use crate::stage::Stage;
use crate::utils::time::{Duration, Instant};

use camera_fit::CameraTween;
use diagnostics::Diagnostics;
use motion::{MotionKind, MotionTween, PlannedMove};

pub use camera_fit::{CameraPose, fit_distance, fit_pose};
pub use dimming::{DimContextId, MaterialDimRegistry, MaterialSnapshot};
pub use layout::{MIN_RADIUS, compute_layout};
pub use options::{
    ArrangementMode, DEFAULT_RESTORE_DURATION, DimOptions, ExplodeOptions, SetMeshesOptions,
};
pub use state::{ExplosionState, SnapshotRegistry, SnapshotSource};

/// Lifecycle of the current set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExploderPhase {
    #[default]
    Idle,
    Exploding,
    Exploded,
    Restoring,
}

/// What the active frame loop is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    CameraFit,
    Motion,
}

/// Borrowed state handed to the phases while they run.
pub(crate) struct TweenCtx<'a> {
    pub(crate) stage: &'a mut Stage,
    pub(crate) diag: &'a mut Diagnostics,
}

enum FrameLoop {
    Camera {
        tween: CameraTween,
        timeline: Timeline,
    },
    Motion {
        tween: MotionTween,
        timeline: Timeline,
    },
}

impl FrameLoop {
    fn kind(&self) -> LoopKind {
        match self {
            Self::Camera { .. } => LoopKind::CameraFit,
            Self::Motion { .. } => LoopKind::Motion,
        }
    }

    fn drive(&mut self, ctx: &mut TweenCtx<'_>, now: Option<Instant>, force: bool) -> bool {
        match self {
            Self::Camera { tween, timeline } => frame::drive(tween, timeline, ctx, now, force),
            Self::Motion { tween, timeline } => frame::drive(tween, timeline, ctx, now, force),
        }
    }
}

/// Queued unit of work. Frame loops span several updates, the rest run at once.
enum Step {
    Frame(FrameLoop),
    /// Dim the non-members under a fresh context, then drop the older ones
    Dim(DimOptions),
    ReleaseDim,
    /// Make `members` the current set
    Adopt {
        members: Vec<NodeHandle>,
        settler: Settler,
    },
    Settle {
        phase: ExploderPhase,
        settler: Option<Settler>,
    },
    Teardown(Settler),
}

/// The set replaced by the last `set_meshes`, kept until its restore ends.
struct PreviousSet {
    members: Vec<NodeHandle>,
    states: FxHashMap<NodeHandle, ExplosionState>,
}

/// Animates a set of scene nodes apart ("explode") and back ("restore").
pub struct GroupExploder {
    phase: ExploderPhase,
    members: Vec<NodeHandle>,
    snapshots: SnapshotRegistry,
    previous: Option<PreviousSet>,

    frames: FrameSlot<FrameLoop>,
    queue: VecDeque<Step>,

    dim_contexts: Vec<DimContextId>,
    planned_targets: Vec<(NodeHandle, Vec3)>,
    diag: Diagnostics,
}

impl Default for GroupExploder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GroupExploder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupExploder")
            .field("phase", &self.phase)
            .field("members", &self.members.len())
            .field("active_frame", &self.frames.handle())
            .field("queued_steps", &self.queue.len())
            .field("dim_contexts", &self.dim_contexts)
            .finish_non_exhaustive()
    }
}

impl GroupExploder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: ExploderPhase::Idle,
            members: Vec::new(),
            snapshots: SnapshotRegistry::new(),
            previous: None,
            frames: FrameSlot::new(),
            queue: VecDeque::new(),
            dim_contexts: Vec::new(),
            planned_targets: Vec::new(),
            diag: Diagnostics::default(),
        }
    }

    /// Subscribes a sink for human-readable progress messages. Replaces any
    /// earlier subscription.
    pub fn on_debug(&mut self, sink: impl FnMut(&str) + 'static) {
        self.diag.subscribe(Box::new(sink));
    }

    /// Checks that the stage camera can be framed and resets to `Idle`.
    pub fn init(&mut self, stage: &Stage) -> Result<()> {
        let fov = camera_fit::frameable_fov(stage)?;
        self.supersede();
        self.phase = ExploderPhase::Idle;
        self.diag.debug(format_args!(
            "Initialized with camera {:?} (fov {:.1} deg)",
            stage.camera,
            fov.to_degrees()
        ));
        Ok(())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Replaces the current set.
    ///
    /// When the current set is exploded and `auto_restore_prev` is on, it is
    /// animated back first and the new set is adopted once that finishes.
    /// A call made while such an adoption is pending replaces the pending set;
    /// the restore already in flight keeps its duration, and with
    /// `auto_restore_prev` off it is snapped to its end so the set is adopted
    /// at once.
    /// Snapshots are kept for members present in both sets, taken for new
    /// members and dropped for departed ones.
    pub fn set_meshes(
        &mut self,
        stage: &mut Stage,
        meshes: &[NodeHandle],
        options: &SetMeshesOptions,
    ) -> Completion {
        let incoming = self.sanitize(stage, meshes);

        if let Some(Step::Adopt { members, settler }) = self
            .queue
            .iter_mut()
            .find(|step| matches!(step, Step::Adopt { .. }))
        {
            let (next, completion) = completion::pair();
            *members = incoming;
            // Dropping the replaced settler supersedes the earlier call.
            drop(std::mem::replace(settler, next));
            self.diag
                .debug(format_args!("Replaced pending set change"));
            if !options.auto_restore_prev {
                self.fast_forward(stage);
            }
            return completion;
        }

        if self.members.is_empty() && incoming.is_empty() {
            return Completion::ready();
        }

        let previous = PreviousSet {
            states: self.snapshots.copy_of(&self.members),
            members: self.members.clone(),
        };
        let deferred = options.auto_restore_prev
            && !previous.members.is_empty()
            && self.phase != ExploderPhase::Idle;
        let (settler, completion) = completion::pair();

        if !deferred {
            self.supersede();
            self.previous = Some(previous);
            self.adopt(stage, incoming);
            settler.finish();
            return completion;
        }

        if self.phase == ExploderPhase::Restoring {
            self.diag.debug(format_args!(
                "Restore in flight; adopting {} objects after it",
                incoming.len()
            ));
        } else {
            self.supersede();
            self.phase = ExploderPhase::Restoring;
            let plan = self.plan_restore(stage, &previous.members, Some(&previous.states));
            self.diag.debug(format_args!(
                "Restoring previous set of {} objects over {:?}",
                plan.len(),
                options.restore_duration
            ));
            self.queue_restore(plan, options.restore_duration, None);
        }
        self.previous = Some(previous);
        self.queue.push_back(Step::Adopt {
            members: incoming,
            settler,
        });

        self.pump(stage, None, false);
        completion
    }

    /// Explodes the current set.
    ///
    /// Fails only when the stage camera cannot be framed; everything else
    /// degrades per object. An empty set is a no-op.
    pub fn explode(&mut self, stage: &mut Stage, options: &ExplodeOptions) -> Result<Completion> {
        self.fast_forward(stage);
        if self.members.is_empty() {
            self.diag.debug(format_args!("Explode skipped: no objects"));
            return Ok(Completion::ready());
        }

        let fov = camera_fit::frameable_fov(stage)?;
        self.supersede();
        self.diag.verbose = options.debug;
        self.phase = ExploderPhase::Exploding;

        stage.scene.update_matrix_world();
        for &member in &self.members {
            if self.snapshots.ensure(&stage.scene, member) {
                self.diag
                    .detail(format_args!("Captured snapshot for {member:?}"));
            }
        }

        let mut positions = Vec::with_capacity(self.members.len());
        for &member in &self.members {
            match stage.scene.world_position(member) {
                Some(p) if p.is_finite() => positions.push((p, 0.0)),
                _ => self.diag.warn(format_args!(
                    "{member:?} has no finite world position; left out of the bounds"
                )),
            }
        }
        let before = BoundingSphere::enclosing(&positions)
            .filter(BoundingSphere::is_finite)
            .unwrap_or(BoundingSphere::new(Vec3::ZERO, 0.0));

        let base_radius = before.radius.max(MIN_RADIUS) + options.spacing;
        let targets = compute_layout(
            options.mode,
            self.members.len(),
            before.center,
            base_radius,
            options.lift * base_radius,
        );

        let inflated: Vec<(Vec3, f32)> = self
            .members
            .iter()
            .zip(&targets)
            .map(|(&member, &target)| {
                let radius = stage
                    .scene
                    .world_bounding_sphere(member)
                    .filter(BoundingSphere::is_finite)
                    .map_or(0.0, |s| s.radius);
                (target, radius)
            })
            .collect();
        let after = BoundingSphere::enclosing(&inflated)
            .filter(BoundingSphere::is_finite)
            .unwrap_or(before);

        let camera_position = stage
            .scene
            .world_position(stage.camera)
            .unwrap_or(Vec3::NAN);
        let reference = stage
            .controls
            .as_ref()
            .map_or(after.center, |controls| controls.target);
        let pose = fit_pose(camera_position, reference, after, options.camera_padding, fov);

        self.diag.debug(format_args!(
            "Explode {} objects ({}): center {}, radius {:.3}, framing radius {:.3}",
            self.members.len(),
            options.mode,
            before.center,
            before.radius,
            after.radius
        ));

        let plan: Vec<PlannedMove> = self
            .members
            .iter()
            .zip(&targets)
            .map(|(&node, &target)| PlannedMove {
                node,
                target,
                snapshot: self.snapshots.resolve(node).map(|(state, _)| state),
            })
            .collect();
        self.planned_targets = self.members.iter().copied().zip(targets).collect();

        let (settler, completion) = completion::pair();
        self.queue.push_back(Step::Frame(FrameLoop::Camera {
            tween: CameraTween::new(pose),
            timeline: Timeline::new(options.camera_duration),
        }));
        self.queue.push_back(Step::Dim(options.dim));
        self.queue.push_back(Step::Frame(FrameLoop::Motion {
            tween: MotionTween::new(MotionKind::Explode, plan),
            timeline: Timeline::new(options.duration),
        }));
        self.queue.push_back(Step::Settle {
            phase: ExploderPhase::Exploded,
            settler: Some(settler),
        });

        self.pump(stage, None, false);
        Ok(completion)
    }

    /// Moves every member back to its snapshot and releases this animator's
    /// dimming. Never fails; members without any snapshot stay where they are.
    pub fn restore(&mut self, stage: &mut Stage, duration: Duration) -> Completion {
        self.fast_forward(stage);
        if self.members.is_empty() {
            return Completion::ready();
        }

        self.supersede();
        self.phase = ExploderPhase::Restoring;
        let members = self.members.clone();
        let plan = self.plan_restore(stage, &members, None);
        self.diag.debug(format_args!(
            "Restore {} objects over {duration:?}",
            plan.len()
        ));

        let (settler, completion) = completion::pair();
        self.queue_restore(plan, duration, Some(settler));
        self.pump(stage, None, false);
        completion
    }

    /// Shuts the animator down. With `restore_first` the current set is
    /// restored (best effort) before every material this animator ever dimmed
    /// is put back and all bookkeeping is cleared.
    pub fn dispose(&mut self, stage: &mut Stage, restore_first: bool) -> Completion {
        self.fast_forward(stage);
        self.supersede();

        if restore_first && !self.members.is_empty() {
            self.phase = ExploderPhase::Restoring;
            let members = self.members.clone();
            let plan = self.plan_restore(stage, &members, None);
            self.queue.push_back(Step::Frame(FrameLoop::Motion {
                tween: MotionTween::new(MotionKind::Restore, plan),
                timeline: Timeline::new(DEFAULT_RESTORE_DURATION),
            }));
        }

        let (settler, completion) = completion::pair();
        self.queue.push_back(Step::Teardown(settler));
        self.pump(stage, None, false);
        completion
    }

    /// Per-frame callback. Advances the active phase to `now` and runs
    /// whatever becomes ready.
    pub fn update(&mut self, stage: &mut Stage, now: Instant) {
        self.pump(stage, Some(now), false);
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ExploderPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn members(&self) -> &[NodeHandle] {
        &self.members
    }

    #[inline]
    #[must_use]
    pub fn states(&self) -> &SnapshotRegistry {
        &self.snapshots
    }

    /// Members of the set replaced by `set_meshes`, while its restore runs.
    #[must_use]
    pub fn previous_members(&self) -> Option<&[NodeHandle]> {
        self.previous.as_ref().map(|p| p.members.as_slice())
    }

    #[inline]
    #[must_use]
    pub fn active_frame(&self) -> Option<FrameHandle> {
        self.frames.handle()
    }

    #[must_use]
    pub fn active_loop(&self) -> Option<LoopKind> {
        self.frames.get().map(FrameLoop::kind)
    }

    /// Targets computed by the last `explode`.
    #[must_use]
    pub fn planned_targets(&self) -> &[(NodeHandle, Vec3)] {
        &self.planned_targets
    }

    #[must_use]
    pub fn dim_contexts(&self) -> &[DimContextId] {
        &self.dim_contexts
    }

    /// Whether any work is scheduled or running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.frames.is_active() || !self.queue.is_empty()
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Runs queued steps until a frame loop needs a later frame or the queue
    /// is empty. `force` finishes frame loops on the spot.
    fn pump(&mut self, stage: &mut Stage, now: Option<Instant>, force: bool) {
        loop {
            if let Some(active) = self.frames.get_mut() {
                let mut ctx = TweenCtx {
                    stage: &mut *stage,
                    diag: &mut self.diag,
                };
                if !active.drive(&mut ctx, now, force) {
                    return;
                }
                if let Some(done) = self.frames.cancel() {
                    self.diag
                        .detail(format_args!("{:?} loop finished", done.kind()));
                }
                continue;
            }

            let Some(step) = self.queue.pop_front() else {
                return;
            };
            self.run_step(stage, step);
        }
    }

    fn run_step(&mut self, stage: &mut Stage, step: Step) {
        match step {
            Step::Frame(frame_loop) => {
                let kind = frame_loop.kind();
                let (handle, _) = self.frames.start(frame_loop);
                self.diag
                    .detail(format_args!("{kind:?} loop scheduled as {handle}"));
            }
            Step::Dim(dim) => self.apply_dimming(stage, dim),
            Step::ReleaseDim => self.release_dimming(stage),
            Step::Adopt { members, settler } => {
                self.adopt(stage, members);
                settler.finish();
            }
            Step::Settle { phase, settler } => {
                self.phase = phase;
                if phase == ExploderPhase::Idle {
                    self.planned_targets.clear();
                }
                self.diag.debug(format_args!("Now {phase:?}"));
                if let Some(settler) = settler {
                    settler.finish();
                }
            }
            Step::Teardown(settler) => {
                self.teardown(stage);
                settler.finish();
            }
        }
    }

    /// Cancels the active loop and drops queued work, superseding every
    /// pending completion.
    fn supersede(&mut self) {
        let cancelled = self.frames.cancel();
        if cancelled.is_some() || !self.queue.is_empty() {
            self.diag.debug(format_args!(
                "Cancelled in-flight work ({} queued steps)",
                self.queue.len()
            ));
        }
        self.queue.clear();
    }

    /// Completes a pending set change right away: the previous set's restore
    /// jumps to its end and the new set is adopted.
    fn fast_forward(&mut self, stage: &mut Stage) {
        if !self.queue.iter().any(|step| matches!(step, Step::Adopt { .. })) {
            return;
        }
        self.diag
            .debug(format_args!("Fast-forwarding pending set change"));
        self.pump(stage, None, true);
    }

    fn queue_restore(&mut self, plan: Vec<PlannedMove>, duration: Duration, settler: Option<Settler>) {
        self.queue.push_back(Step::Frame(FrameLoop::Motion {
            tween: MotionTween::new(MotionKind::Restore, plan),
            timeline: Timeline::new(duration),
        }));
        self.queue.push_back(Step::ReleaseDim);
        self.queue.push_back(Step::Settle {
            phase: ExploderPhase::Idle,
            settler,
        });
    }

    // ========================================================================
    // Set bookkeeping
    // ========================================================================

    /// Drops duplicates and nodes that are not in the scene, keeping order.
    fn sanitize(&mut self, stage: &Stage, meshes: &[NodeHandle]) -> Vec<NodeHandle> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::with_capacity(meshes.len());
        for &handle in meshes {
            if !stage.scene.contains(handle) {
                self.diag
                    .warn(format_args!("{handle:?} is not in the scene; ignored"));
                continue;
            }
            if seen.insert(handle) {
                out.push(handle);
            }
        }
        out
    }

    /// Restore moves for `members`, from the copied states when given, else
    /// from the registry (falling back to its secondary copy).
    fn plan_restore(
        &mut self,
        stage: &Stage,
        members: &[NodeHandle],
        copied: Option<&FxHashMap<NodeHandle, ExplosionState>>,
    ) -> Vec<PlannedMove> {
        let mut plan = Vec::with_capacity(members.len());
        for &node in members {
            let copy = copied.and_then(|states| states.get(&node).copied());
            let snapshot = match copy.map(|s| (s, SnapshotSource::Primary)) {
                Some(found) => Some(found),
                None => self.snapshots.resolve(node),
            };

            match snapshot {
                Some((state, source)) => {
                    if source == SnapshotSource::Fallback {
                        self.diag.warn(format_args!(
                            "Snapshot of {node:?} recovered from the fallback registry"
                        ));
                    }
                    plan.push(PlannedMove {
                        node,
                        target: state.original_position(),
                        snapshot: Some(state),
                    });
                }
                None => {
                    self.diag.warn(format_args!(
                        "No snapshot for {node:?}; leaving it in place"
                    ));
                    if let Some(position) = stage.scene.world_position(node) {
                        plan.push(PlannedMove {
                            node,
                            target: position,
                            snapshot: None,
                        });
                    }
                }
            }
        }
        plan
    }

    /// Makes `incoming` the current set, reconciling snapshots by content.
    fn adopt(&mut self, stage: &mut Stage, incoming: Vec<NodeHandle>) {
        let outgoing = std::mem::take(&mut self.members);

        if outgoing == incoming {
            self.diag
                .debug(format_args!("Set unchanged ({} objects)", incoming.len()));
        } else {
            let old: FxHashSet<NodeHandle> = outgoing.iter().copied().collect();
            let new: FxHashSet<NodeHandle> = incoming.iter().copied().collect();

            let mut removed = 0;
            for &gone in outgoing.iter().filter(|h| !new.contains(h)) {
                self.snapshots.forget(gone);
                removed += 1;
            }

            stage.scene.update_matrix_world();
            let mut added = 0;
            for &fresh in incoming.iter().filter(|h| !old.contains(h)) {
                if self.snapshots.ensure(&stage.scene, fresh) {
                    self.diag
                        .detail(format_args!("Captured snapshot for {fresh:?}"));
                }
                added += 1;
            }

            self.diag.debug(format_args!(
                "Adopted {} objects (+{added} -{removed})",
                incoming.len()
            ));
        }

        self.members = incoming;
        self.previous = None;
        self.planned_targets.clear();
        self.phase = ExploderPhase::Idle;
    }

    // ========================================================================
    // Dimming
    // ========================================================================

    fn apply_dimming(&mut self, stage: &mut Stage, dim: DimOptions) {
        if !dim.enabled {
            self.release_dimming(stage);
            return;
        }

        let members: FxHashSet<NodeHandle> = self.members.iter().copied().collect();
        let mut keys: Vec<MaterialKey> = Vec::new();
        let scene = &stage.scene;
        scene.traverse(|handle, node| {
            if members.contains(&handle) {
                return;
            }
            if let Some(mesh) = node.mesh.and_then(|key| scene.meshes.get(key)) {
                keys.extend(mesh.materials.iter().copied());
            }
        });

        let opacity = if dim.opacity.is_finite() {
            dim.opacity.clamp(0.0, 1.0)
        } else {
            DimOptions::default().opacity
        };

        let ctx = stage.dimming.begin_context();
        for key in keys {
            if let Some(material) = stage.scene.materials.get_mut(key) {
                stage.dimming.dim(ctx, key, material, opacity);
            }
        }

        let stale = std::mem::replace(&mut self.dim_contexts, vec![ctx]);
        for old in stale {
            stage.dimming.release(old, &mut stage.scene.materials);
        }
        self.diag
            .debug(format_args!("Dimmed non-members under {ctx}"));
    }

    fn release_dimming(&mut self, stage: &mut Stage) {
        let mut restored = 0;
        for ctx in self.dim_contexts.drain(..) {
            restored += stage.dimming.release(ctx, &mut stage.scene.materials);
        }
        if restored > 0 {
            self.diag
                .debug(format_args!("Released dimming, {restored} materials restored"));
        }
    }

    fn teardown(&mut self, stage: &mut Stage) {
        let restored = stage
            .dimming
            .force_release(&self.dim_contexts, &mut stage.scene.materials);
        self.dim_contexts.clear();
        self.snapshots.clear();
        self.members.clear();
        self.previous = None;
        self.planned_targets.clear();
        self.phase = ExploderPhase::Idle;
        self.diag
            .debug(format_args!("Disposed, {restored} materials force restored"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Outcome;
    use crate::scene::{BoundingBox, Camera, Material, Scene};

    fn stage_with_parts(count: usize) -> (Stage, Vec<NodeHandle>) {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::new_perspective(60.0, 1.5, 0.1, 1000.0));
        if let Some(node) = scene.get_node_mut(camera) {
            node.transform.position = Vec3::new(0.0, 0.0, 20.0);
        }
        let material = scene.add_material(Material::default());
        let parts = (0..count)
            .map(|i| {
                scene
                    .build_node(&format!("part-{i}"))
                    .with_position(i as f32, 0.0, 0.0)
                    .with_mesh(BoundingBox::from_half_extents(Vec3::splat(0.5)), material)
                    .build()
            })
            .collect();
        scene.update_matrix_world();
        (Stage::new(scene, camera), parts)
    }

    #[test]
    fn restore_recovers_from_fallback_snapshot() {
        let (mut stage, parts) = stage_with_parts(2);
        let mut exploder = GroupExploder::new();
        let _ = exploder.set_meshes(&mut stage, &parts, &SetMeshesOptions::default());

        let options = ExplodeOptions {
            duration: Duration::ZERO,
            camera_duration: Duration::ZERO,
            ..Default::default()
        };
        let mut exploded = exploder.explode(&mut stage, &options).unwrap();
        assert_eq!(exploded.outcome(), Some(Outcome::Finished));

        let lost = parts[1];
        let original = exploder.snapshots.drop_primary(lost).unwrap();
        assert!(exploder.states().get(lost).is_none());
        assert_eq!(
            exploder.states().resolve(lost).map(|(_, source)| source),
            Some(SnapshotSource::Fallback)
        );

        let mut restored = exploder.restore(&mut stage, Duration::ZERO);
        assert_eq!(restored.outcome(), Some(Outcome::Finished));

        let position = stage.scene.world_position(lost).unwrap();
        assert!(position.distance(original.original_position()) < 1e-4);
    }

    #[test]
    fn pending_adoption_is_coalesced() {
        let (mut stage, parts) = stage_with_parts(3);
        let mut exploder = GroupExploder::new();
        let _ = exploder.set_meshes(&mut stage, &parts[..2], &SetMeshesOptions::default());
        let options = ExplodeOptions {
            duration: Duration::ZERO,
            camera_duration: Duration::ZERO,
            ..Default::default()
        };
        let _ = exploder.explode(&mut stage, &options).unwrap();

        let slow = SetMeshesOptions {
            restore_duration: Duration::from_millis(200),
            ..Default::default()
        };
        let mut first = exploder.set_meshes(&mut stage, &parts[1..], &slow);
        let mut second = exploder.set_meshes(&mut stage, &parts[2..], &slow);
        assert_eq!(first.outcome(), Some(Outcome::Superseded));
        assert_eq!(second.outcome(), None);
        assert_eq!(exploder.previous_members(), Some(&parts[..2]));

        let t0 = Instant::now();
        exploder.update(&mut stage, t0);
        exploder.update(&mut stage, t0 + Duration::from_millis(250));
        assert_eq!(second.outcome(), Some(Outcome::Finished));
        assert_eq!(exploder.members(), &parts[2..]);
        assert!(exploder.previous_members().is_none());
        assert!(exploder.states().get(parts[0]).is_none());
        assert!(exploder.states().get(parts[2]).is_some());
    }
}

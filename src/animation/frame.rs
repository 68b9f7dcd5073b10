//! Per-frame loops.
//!
//! An animation phase is a [`Tween`] paired with a [`Timeline`]. The host
//! advances it once per display frame with [`drive`]; the owner keeps at most
//! one phase alive at a time in a [`FrameSlot`], which hands out a fresh
//! [`FrameHandle`] per phase and drops the previous one on replacement.

use std::fmt;

use crate::animation::easing::{ease_in_out_quad, progress};
use crate::utils::time::{Duration, Instant};

/// Identifies one scheduled frame loop. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Single-occupancy slot for the active frame loop.
#[derive(Debug)]
pub struct FrameSlot<T> {
    next_id: u64,
    active: Option<(FrameHandle, T)>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: None,
        }
    }

    /// Installs `value` under a new handle. Whatever occupied the slot is
    /// returned, already cancelled.
    pub fn start(&mut self, value: T) -> (FrameHandle, Option<T>) {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        let previous = self.active.replace((handle, value)).map(|(_, v)| v);
        (handle, previous)
    }

    /// Cancels the active loop, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.active.take().map(|(_, v)| v)
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Option<FrameHandle> {
        self.active.as_ref().map(|(h, _)| *h)
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.active.as_ref().map(|(_, v)| v)
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut().map(|(_, v)| v)
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

/// Clock of one phase. Starts on the first frame it is sampled with.
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    duration: Duration,
    started: Option<Instant>,
    begun: bool,
}

impl Timeline {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
            begun: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress at `now`, or `None` while no frame has been seen yet.
    /// Zero-length timelines are complete without a frame.
    pub fn sample(&mut self, now: Option<Instant>) -> Option<f32> {
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let now = now?;
        let start = *self.started.get_or_insert(now);
        Some(progress(now.saturating_duration_since(start), self.duration))
    }
}

/// One animation phase.
pub trait Tween<Ctx> {
    /// Captures start values. Runs once, before the first `apply`.
    fn begin(&mut self, ctx: &mut Ctx);
    /// Writes the state at eased progress `t`.
    fn apply(&mut self, ctx: &mut Ctx, t: f32);
    /// Runs once after `apply(1.0)`.
    fn finish(&mut self, ctx: &mut Ctx);
}

/// Advances `tween` to `now` (or straight to the end with `force`) under the
/// ease-in-out-quad curve. Returns `true` once the phase has finished.
pub fn drive<Ctx, T: Tween<Ctx>>(
    tween: &mut T,
    timeline: &mut Timeline,
    ctx: &mut Ctx,
    now: Option<Instant>,
    force: bool,
) -> bool {
    if !timeline.begun {
        tween.begin(ctx);
        timeline.begun = true;
    }

    let t = if force {
        1.0
    } else {
        match timeline.sample(now) {
            Some(t) => t,
            None => return false,
        }
    };

    tween.apply(ctx, ease_in_out_quad(t));
    if t >= 1.0 {
        tween.finish(ctx);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        begun: u32,
        finished: u32,
        samples: Vec<f32>,
    }

    struct Probe;

    impl Tween<Recorder> for Probe {
        fn begin(&mut self, ctx: &mut Recorder) {
            ctx.begun += 1;
        }
        fn apply(&mut self, ctx: &mut Recorder, t: f32) {
            ctx.samples.push(t);
        }
        fn finish(&mut self, ctx: &mut Recorder) {
            ctx.finished += 1;
        }
    }

    #[test]
    fn slot_replacement_mints_new_handle() {
        let mut slot = FrameSlot::new();
        let (first, none) = slot.start("a");
        assert!(none.is_none());
        let (second, cancelled) = slot.start("b");
        assert_eq!(cancelled, Some("a"));
        assert_ne!(first, second);
        assert_eq!(slot.handle(), Some(second));
        assert_eq!(slot.cancel(), Some("b"));
        assert!(!slot.is_active());
    }

    #[test]
    fn zero_duration_finishes_without_a_frame() {
        let mut rec = Recorder::default();
        let mut timeline = Timeline::new(Duration::ZERO);
        assert!(drive(&mut Probe, &mut timeline, &mut rec, None, false));
        assert_eq!(rec.begun, 1);
        assert_eq!(rec.finished, 1);
        assert_eq!(rec.samples, vec![1.0]);
    }

    #[test]
    fn timeline_starts_on_first_frame() {
        let mut rec = Recorder::default();
        let mut timeline = Timeline::new(Duration::from_millis(100));
        assert!(!drive(&mut Probe, &mut timeline, &mut rec, None, false));
        assert!(rec.samples.is_empty());

        let t0 = Instant::now();
        assert!(!drive(&mut Probe, &mut timeline, &mut rec, Some(t0), false));
        assert!(!drive(&mut Probe, &mut timeline, &mut rec, Some(t0 + Duration::from_millis(50)), false));
        assert!(drive(&mut Probe, &mut timeline, &mut rec, Some(t0 + Duration::from_millis(100)), false));

        assert_eq!(rec.begun, 1);
        assert_eq!(rec.finished, 1);
        assert_eq!(rec.samples.first().copied(), Some(0.0));
        assert_eq!(rec.samples.last().copied(), Some(1.0));
    }
}

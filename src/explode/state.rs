//! Pre-explosion snapshots.

use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, Scene};

/// Where a node sat before it was exploded. Replaced wholesale, never edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionState {
    /// `None` means the scene root
    pub original_parent: Option<NodeHandle>,
    pub original_world: Affine3A,
}

impl ExplosionState {
    /// Captures the node's current parent and world transform.
    #[must_use]
    pub fn capture(scene: &Scene, handle: NodeHandle) -> Option<Self> {
        let node = scene.get_node(handle)?;
        Some(Self {
            original_parent: node.parent(),
            original_world: *node.world_matrix(),
        })
    }

    #[inline]
    #[must_use]
    pub fn original_position(&self) -> Vec3 {
        self.original_world.translation.into()
    }
}

/// Which map a snapshot was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Primary,
    Fallback,
}

/// Snapshot store with a fallback copy.
///
/// Every write goes to both maps. Lookups consult the fallback only when the
/// primary misses, so a lost primary entry can still be restored.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRegistry {
    primary: FxHashMap<NodeHandle, ExplosionState>,
    fallback: FxHashMap<NodeHandle, ExplosionState>,
}

impl SnapshotRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a snapshot for `handle` unless the primary map has one.
    /// Returns `true` when a new snapshot was taken.
    pub fn ensure(&mut self, scene: &Scene, handle: NodeHandle) -> bool {
        if self.primary.contains_key(&handle) {
            return false;
        }
        match ExplosionState::capture(scene, handle) {
            Some(state) => {
                self.insert(handle, state);
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, handle: NodeHandle, state: ExplosionState) {
        self.primary.insert(handle, state);
        self.fallback.insert(handle, state);
    }

    /// Forgets a node entirely.
    pub fn forget(&mut self, handle: NodeHandle) {
        self.primary.remove(&handle);
        self.fallback.remove(&handle);
    }

    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&ExplosionState> {
        self.primary.get(&handle)
    }

    /// Primary lookup, then fallback.
    #[must_use]
    pub fn resolve(&self, handle: NodeHandle) -> Option<(ExplosionState, SnapshotSource)> {
        if let Some(state) = self.primary.get(&handle) {
            return Some((*state, SnapshotSource::Primary));
        }
        self.fallback
            .get(&handle)
            .map(|state| (*state, SnapshotSource::Fallback))
    }

    /// Deep copy of the primary entries for `members`.
    #[must_use]
    pub fn copy_of(&self, members: &[NodeHandle]) -> FxHashMap<NodeHandle, ExplosionState> {
        members
            .iter()
            .filter_map(|h| self.primary.get(h).map(|s| (*h, *s)))
            .collect()
    }

    #[must_use]
    pub fn primary(&self) -> &FxHashMap<NodeHandle, ExplosionState> {
        &self.primary
    }

    /// Drops the primary entry only, leaving the fallback copy behind.
    #[cfg(test)]
    pub(crate) fn drop_primary(&mut self, handle: NodeHandle) -> Option<ExplosionState> {
        self.primary.remove(&handle)
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.fallback.clear();
    }
}

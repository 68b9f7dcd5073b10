//! Reference-counted material dimming.
//!
//! Dimming rounds are identified by a [`DimContextId`]. A material dimmed by
//! several live contexts keeps the snapshot taken by the first one and is only
//! restored when the last of them is released, so one round's cleanup never
//! undoes another round's still-active dimming.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use uuid::Uuid;

use crate::scene::{Material, MaterialKey};

/// Token for one round of dimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimContextId(Uuid);

impl fmt::Display for DimContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dim-{}", self.0.simple())
    }
}

/// Appearance of a material before any context dimmed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSnapshot {
    pub transparent: bool,
    pub opacity: f32,
    pub depth_write: bool,
}

impl MaterialSnapshot {
    #[must_use]
    pub fn capture(material: &Material) -> Self {
        Self {
            transparent: material.transparent,
            opacity: material.opacity,
            depth_write: material.depth_write,
        }
    }

    pub fn apply(&self, material: &mut Material) {
        material.transparent = self.transparent;
        material.opacity = self.opacity;
        material.depth_write = self.depth_write;
    }
}

#[derive(Debug, Default)]
pub struct MaterialDimRegistry {
    snapshots: FxHashMap<MaterialKey, MaterialSnapshot>,
    material_contexts: FxHashMap<MaterialKey, FxHashSet<DimContextId>>,
    context_materials: FxHashMap<DimContextId, FxHashSet<MaterialKey>>,
}

impl MaterialDimRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh, empty context.
    pub fn begin_context(&mut self) -> DimContextId {
        let id = DimContextId(Uuid::new_v4());
        self.context_materials.insert(id, FxHashSet::default());
        id
    }

    /// Dims `material` under `ctx`. The first dimming of a material snapshots
    /// it; later ones only add a reference and apply the new opacity.
    pub fn dim(&mut self, ctx: DimContextId, key: MaterialKey, material: &mut Material, opacity: f32) {
        self.snapshots
            .entry(key)
            .or_insert_with(|| MaterialSnapshot::capture(material));
        self.material_contexts.entry(key).or_default().insert(ctx);
        self.context_materials.entry(ctx).or_default().insert(key);

        material.transparent = true;
        material.opacity = opacity;
        material.depth_write = false;
    }

    /// Releases `ctx`. Materials whose last reference this was are restored.
    /// Returns the number of materials restored.
    pub fn release(
        &mut self,
        ctx: DimContextId,
        materials: &mut SlotMap<MaterialKey, Material>,
    ) -> usize {
        let Some(keys) = self.context_materials.remove(&ctx) else {
            return 0;
        };

        let mut restored = 0;
        for key in keys {
            let Some(refs) = self.material_contexts.get_mut(&key) else {
                continue;
            };
            refs.remove(&ctx);
            if refs.is_empty() {
                self.material_contexts.remove(&key);
                if self.restore_snapshot(key, materials) {
                    restored += 1;
                }
            }
        }
        restored
    }

    /// Restores every material touched by `contexts` regardless of other
    /// references, and purges those materials from every context so nothing
    /// restores them a second time. Returns the number of materials restored.
    pub fn force_release(
        &mut self,
        contexts: &[DimContextId],
        materials: &mut SlotMap<MaterialKey, Material>,
    ) -> usize {
        let mut keys: FxHashSet<MaterialKey> = FxHashSet::default();
        for ctx in contexts {
            if let Some(touched) = self.context_materials.remove(ctx) {
                keys.extend(touched);
            }
        }

        let mut restored = 0;
        for key in keys {
            if let Some(refs) = self.material_contexts.remove(&key) {
                for other in refs {
                    if let Some(set) = self.context_materials.get_mut(&other) {
                        set.remove(&key);
                    }
                }
            }
            if self.restore_snapshot(key, materials) {
                restored += 1;
            }
        }
        restored
    }

    fn restore_snapshot(&mut self, key: MaterialKey, materials: &mut SlotMap<MaterialKey, Material>) -> bool {
        let Some(snapshot) = self.snapshots.remove(&key) else {
            return false;
        };
        match materials.get_mut(key) {
            Some(material) => {
                snapshot.apply(material);
                true
            }
            None => {
                log::warn!("Dimmed material {key:?} no longer exists; dropping its snapshot");
                false
            }
        }
    }

    /// Number of live contexts referencing `key`.
    #[must_use]
    pub fn ref_count(&self, key: MaterialKey) -> usize {
        self.material_contexts.get(&key).map_or(0, |refs| refs.len())
    }

    #[must_use]
    pub fn is_dimmed(&self, key: MaterialKey) -> bool {
        self.ref_count(key) > 0
    }

    #[must_use]
    pub fn snapshot(&self, key: MaterialKey) -> Option<&MaterialSnapshot> {
        self.snapshots.get(&key)
    }

    #[must_use]
    pub fn live_contexts(&self) -> usize {
        self.context_materials.len()
    }

    #[must_use]
    pub fn is_live(&self, ctx: DimContextId) -> bool {
        self.context_materials.contains_key(&ctx)
    }
}

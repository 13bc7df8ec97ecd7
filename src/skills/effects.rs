//! Per-side effect storage.
//!
//! Active effects are a fixed record with one optional magnitude per
//! `SkillKind`, so "no effect" is a `None` slot rather than a missing map
//! key, and no kind outside the enumeration can ever be stored.

use serde::{Deserialize, Serialize};

use crate::core::{Side, SideMap};

use super::skill::SkillKind;

/// One optional magnitude per skill kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSlots {
    slots: [Option<i32>; SkillKind::COUNT],
}

impl EffectSlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, kind: SkillKind) -> Option<i32> {
        self.slots[kind.index()]
    }

    /// Magnitude of `kind`, or zero when inactive.
    #[must_use]
    pub fn value(&self, kind: SkillKind) -> i32 {
        self.get(kind).unwrap_or(0)
    }

    pub fn set(&mut self, kind: SkillKind, magnitude: i32) {
        self.slots[kind.index()] = Some(magnitude);
    }

    #[must_use]
    pub fn is_active(&self, kind: SkillKind) -> bool {
        self.get(kind).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [None; SkillKind::COUNT];
    }

    /// Active (kind, magnitude) pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (SkillKind, i32)> + '_ {
        SkillKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|v| (kind, v)))
    }
}

/// Current-turn and pending-next-turn effects for both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectState {
    /// Effects in force for the turn being resolved.
    pub current: SideMap<EffectSlots>,
    /// Effects that become current after the next turn reset.
    pub pending: SideMap<EffectSlots>,
}

impl EffectState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace current with pending for both sides, then clear pending.
    pub fn advance_turn(&mut self) {
        self.current = self.pending;
        self.pending = SideMap::default();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn current(&self, side: Side) -> &EffectSlots {
        &self.current[side]
    }

    #[must_use]
    pub fn pending(&self, side: Side) -> &EffectSlots {
        &self.pending[side]
    }
}

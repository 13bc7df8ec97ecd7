//! Skill effect system.
//!
//! A skill puts one effect on its caster's side for the current turn.
//! `Shield` additionally schedules a `ShieldPenalty` for the opposing side,
//! which surfaces one turn later when `reset_turn_effects` promotes
//! pending effects to current.
//!
//! ## Key Components
//!
//! - [`SkillKind`] / [`SkillConfig`]: What a skill does and how strongly
//! - [`EffectSlots`] / [`EffectState`]: Fixed per-kind storage, current
//!   and pending, per side
//! - [`SkillService`]: Capability set used by the turn controller
//! - [`SkillEngine`]: Standard implementation over the six-skill catalog

mod skill;
mod effects;
mod engine;

pub use skill::{standard_skills, SkillConfig, SkillKind};
pub use effects::{EffectSlots, EffectState};
pub use engine::{SkillEngine, SkillService};

//! Skill activation and stat modification.
//!
//! `SkillService` is the capability set the turn controller needs from a
//! skill system. `SkillEngine` is the standard implementation: it draws
//! from the fixed catalog, keeps current/pending effects per side and
//! turns them into modified attack, defense and health values.

use crate::core::{BattleError, GameRng, Side, SideMap};

use super::effects::EffectState;
use super::skill::{standard_skills, SkillConfig, SkillKind};

/// Skill system seen by the turn controller.
///
/// ## Implementation Notes
///
/// - `activate_skill` replaces the side's current skill; skills never
///   stack within a turn
/// - `modified_attack`/`modified_defense` never return negative values
/// - `reset_turn_effects` promotes pending effects to current
pub trait SkillService {
    /// Draw a skill uniformly from the catalog.
    fn random_skill(&mut self) -> SkillConfig;

    /// Make `skill` the only active skill for `side` this turn.
    ///
    /// A shield penalty already delivered to `side` stays in force.
    fn activate_skill(&mut self, skill: &SkillConfig, side: Side);

    /// `base` adjusted by the side's boosts, the opposing debuff and any
    /// shield penalty, floored at zero.
    fn modified_attack(&self, base: i32, side: Side) -> i32;

    /// `base` adjusted by the side's boost and the opposing debuff,
    /// floored at zero.
    fn modified_defense(&self, base: i32, side: Side) -> i32;

    /// Apply the side's health boost and shield.
    ///
    /// Returns `(health, damage)` after the boost is added and the shield
    /// has absorbed up to its magnitude of the incoming damage.
    fn apply_health_effects(&self, health: i32, damage: i32, side: Side) -> (i32, i32);

    /// End-of-turn reset: current effects are replaced by pending ones and
    /// the current-skill display state is cleared.
    fn reset_turn_effects(&mut self);

    /// Drop every current and pending effect. Used when a battle restarts.
    fn clear_effects(&mut self);

    /// Skill last activated for `side` this turn.
    fn current_skill(&self, side: Side) -> Option<&SkillConfig>;
}

/// Standard skill system.
///
/// ## Example
///
/// ```
/// use card_duel::core::{GameRng, Side};
/// use card_duel::skills::{SkillConfig, SkillEngine, SkillKind, SkillService};
///
/// let mut engine = SkillEngine::new(GameRng::new(42));
/// let boost = SkillConfig::new(SkillKind::AttackBoost, 20, "Attack +20");
/// engine.activate_skill(&boost, Side::Player);
///
/// assert_eq!(engine.modified_attack(50, Side::Player), 70);
/// assert_eq!(engine.modified_attack(50, Side::Opponent), 50);
/// ```
#[derive(Clone, Debug)]
pub struct SkillEngine {
    catalog: Vec<SkillConfig>,
    effects: EffectState,
    current_skills: SideMap<Option<SkillConfig>>,
    rng: GameRng,
}

impl SkillEngine {
    /// Create an engine over the standard six-skill catalog.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self::from_parts(standard_skills(), rng)
    }

    /// Create an engine over a custom catalog.
    ///
    /// Fails with `EmptyCatalog` if there is nothing to draw from.
    pub fn with_catalog(catalog: Vec<SkillConfig>, rng: GameRng) -> Result<Self, BattleError> {
        if catalog.is_empty() {
            tracing::warn!("skill catalog is empty");
            return Err(BattleError::EmptyCatalog);
        }
        Ok(Self::from_parts(catalog, rng))
    }

    fn from_parts(catalog: Vec<SkillConfig>, rng: GameRng) -> Self {
        Self {
            catalog,
            effects: EffectState::default(),
            current_skills: SideMap::default(),
            rng,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &[SkillConfig] {
        &self.catalog
    }

    /// Current and pending effect state.
    #[must_use]
    pub fn effects(&self) -> &EffectState {
        &self.effects
    }
}

impl SkillService for SkillEngine {
    fn random_skill(&mut self) -> SkillConfig {
        let index = self.rng.gen_index(self.catalog.len()).unwrap_or(0);
        self.catalog[index].clone()
    }

    fn activate_skill(&mut self, skill: &SkillConfig, side: Side) {
        let current = &mut self.effects.current[side];
        let penalty = current.get(SkillKind::ShieldPenalty);
        current.clear();
        // A delivered shield penalty is not a skill; it outlives the swap.
        if let Some(penalty) = penalty {
            current.set(SkillKind::ShieldPenalty, penalty);
        }
        current.set(skill.kind, skill.primary);

        // The penalty belongs to the opponent's next turn, not the caster's.
        if skill.kind == SkillKind::Shield {
            self.effects.pending[side.other()].set(SkillKind::ShieldPenalty, skill.secondary);
        }

        tracing::debug!(%side, kind = ?skill.kind, primary = skill.primary, "skill activated");
        self.current_skills[side] = Some(skill.clone());
    }

    fn modified_attack(&self, base: i32, side: Side) -> i32 {
        let own = self.effects.current(side);
        let opposing = self.effects.current(side.other());

        base.saturating_add(own.value(SkillKind::AttackBoost))
            .saturating_sub(opposing.value(SkillKind::OpponentAttackDebuff))
            .saturating_add(own.value(SkillKind::ShieldPenalty))
            .max(0)
    }

    fn modified_defense(&self, base: i32, side: Side) -> i32 {
        let own = self.effects.current(side);
        let opposing = self.effects.current(side.other());

        base.saturating_add(own.value(SkillKind::DefenseBoost))
            .saturating_sub(opposing.value(SkillKind::OpponentDefenseDebuff))
            .max(0)
    }

    fn apply_health_effects(&self, health: i32, damage: i32, side: Side) -> (i32, i32) {
        let own = self.effects.current(side);

        let health = match own.get(SkillKind::HealthBoost) {
            Some(boost) => health.saturating_add(boost),
            None => health,
        };
        let damage = match own.get(SkillKind::Shield) {
            Some(shield) => damage - damage.min(shield.max(0)),
            None => damage,
        };
        (health, damage)
    }

    fn reset_turn_effects(&mut self) {
        self.effects.advance_turn();
        self.current_skills = SideMap::default();
    }

    fn clear_effects(&mut self) {
        self.effects.clear();
        self.current_skills = SideMap::default();
    }

    fn current_skill(&self, side: Side) -> Option<&SkillConfig> {
        self.current_skills[side].as_ref()
    }
}

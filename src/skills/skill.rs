//! Skill definitions and the fixed skill catalog.

use serde::{Deserialize, Serialize};

/// Every kind of effect a skill can put on a side.
///
/// `ShieldPenalty` is never drawn; it only appears as the deferred
/// consequence of the opponent's `Shield`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Adds to the caster's health before damage lands.
    HealthBoost,
    /// Adds to the caster's card attack.
    AttackBoost,
    /// Adds to the caster's card defense.
    DefenseBoost,
    /// Subtracts from the opposing card's attack.
    OpponentAttackDebuff,
    /// Subtracts from the opposing card's defense.
    OpponentDefenseDebuff,
    /// Absorbs incoming damage up to its magnitude.
    Shield,
    /// Attack bonus granted to the side facing a shield, one turn later.
    ShieldPenalty,
}

impl SkillKind {
    /// Number of skill kinds.
    pub const COUNT: usize = 7;

    /// Every skill kind, in declaration order.
    pub const ALL: [SkillKind; Self::COUNT] = [
        SkillKind::HealthBoost,
        SkillKind::AttackBoost,
        SkillKind::DefenseBoost,
        SkillKind::OpponentAttackDebuff,
        SkillKind::OpponentDefenseDebuff,
        SkillKind::Shield,
        SkillKind::ShieldPenalty,
    ];

    /// Dense index for fixed-size per-kind storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A drawable skill.
///
/// `secondary` is only meaningful for `Shield`, where it seeds the
/// opponent's next-turn `ShieldPenalty`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillConfig {
    pub kind: SkillKind,
    pub primary: i32,
    pub secondary: i32,
    pub description: String,
}

impl SkillConfig {
    /// Create a skill with no secondary magnitude.
    pub fn new(kind: SkillKind, primary: i32, description: impl Into<String>) -> Self {
        Self {
            kind,
            primary,
            secondary: 0,
            description: description.into(),
        }
    }

    /// Set the secondary magnitude (builder pattern).
    #[must_use]
    pub fn with_secondary(mut self, secondary: i32) -> Self {
        self.secondary = secondary;
        self
    }

    /// Absorb `shield` damage; the opponent gets `penalty` attack next turn.
    pub fn shield(shield: i32, penalty: i32) -> Self {
        Self::new(
            SkillKind::Shield,
            shield,
            format!("Shield {shield} DMG, Enemy +{penalty} ATK next turn"),
        )
        .with_secondary(penalty)
    }
}

/// The six skills a side can draw.
#[must_use]
pub fn standard_skills() -> Vec<SkillConfig> {
    vec![
        SkillConfig::new(SkillKind::HealthBoost, 30, "Heal +30 HP"),
        SkillConfig::new(SkillKind::AttackBoost, 20, "Attack +20"),
        SkillConfig::new(SkillKind::DefenseBoost, 15, "Defense +15"),
        SkillConfig::new(SkillKind::OpponentAttackDebuff, 15, "Enemy Attack -15"),
        SkillConfig::new(SkillKind::OpponentDefenseDebuff, 10, "Enemy Defense -10"),
        SkillConfig::shield(25, 10),
    ]
}

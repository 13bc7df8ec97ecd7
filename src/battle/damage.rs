//! Damage computation for one exchange.
//!
//! Both directions are computed from the same pre-turn state: neither
//! side's damage output changes the other's this turn.

use serde::{Deserialize, Serialize};

use crate::cards::CardData;
use crate::core::{Side, SideMap};
use crate::skills::SkillService;

/// Damage an attack deals through a defense; never negative.
#[must_use]
pub fn damage(attack: i32, defense: i32) -> i32 {
    attack.saturating_sub(defense).max(0)
}

/// Effective stats and raw damage for both sides of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Skill-modified attack per side.
    pub attack: SideMap<i32>,
    /// Skill-modified defense per side.
    pub defense: SideMap<i32>,
    /// Damage each side deals, before the target's shield.
    pub dealt: SideMap<i32>,
}

impl Exchange {
    /// Compute the exchange between the two committed cards.
    pub fn compute<S: SkillService + ?Sized>(skills: &S, cards: SideMap<CardData>) -> Self {
        let attack = cards.map(|side, card| skills.modified_attack(card.attack(), side));
        let defense = cards.map(|side, card| skills.modified_defense(card.defense(), side));
        let dealt = SideMap::from_fn(|side| damage(attack[side], defense[side.other()]));

        Self {
            attack,
            defense,
            dealt,
        }
    }

    /// Damage arriving at `side`, before its shield.
    #[must_use]
    pub fn incoming(&self, side: Side) -> i32 {
        self.dealt[side.other()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;
    use crate::core::GameRng;
    use crate::skills::{SkillConfig, SkillEngine, SkillKind};

    #[test]
    fn test_damage_floor() {
        assert_eq!(damage(70, 10), 60);
        assert_eq!(damage(10, 10), 0);
        assert_eq!(damage(5, 30), 0);
        assert_eq!(damage(i32::MAX, 0), i32::MAX);
        assert_eq!(damage(0, i32::MAX), 0);
    }

    #[test]
    fn test_exchange_is_simultaneous() {
        let mut skills = SkillEngine::new(GameRng::new(1));
        skills.activate_skill(
            &SkillConfig::new(SkillKind::AttackBoost, 20, "Attack +20"),
            Side::Player,
        );

        let cards = SideMap::new(
            CardData::new(CardKind::Messi, 50, 20),
            CardData::new(CardKind::Kane, 45, 10),
        );
        let exchange = Exchange::compute(&skills, cards);

        assert_eq!(exchange.attack, SideMap::new(70, 45));
        assert_eq!(exchange.defense, SideMap::new(20, 10));
        assert_eq!(exchange.dealt, SideMap::new(60, 25));
        assert_eq!(exchange.incoming(Side::Opponent), 60);
        assert_eq!(exchange.incoming(Side::Player), 25);
    }
}

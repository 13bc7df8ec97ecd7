//! Battle state machine.
//!
//! Owns the health totals, the turn counter and the player's committed
//! card, and decides when the battle is over.
//!
//! ```text
//! NotStarted --initialize--> InProgress --check_game_over--> Finished
//!                                ^                              |
//!                                +---------initialize-----------+
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::{CardData, SlotId};
use crate::core::{BattleConfig, BattleError, Side, SideMap};

use super::outcome::{BattleOutcome, FinishReason};

/// Lifecycle of a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    NotStarted,
    InProgress,
    Finished(BattleOutcome),
}

/// The card the human side has committed for this turn, and where from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedCard {
    pub slot: SlotId,
    pub card: CardData,
}

/// Health, turn counter and battle lifecycle.
///
/// ## Example
///
/// ```
/// use card_duel::battle::BattleStateMachine;
/// use card_duel::core::{BattleConfig, Side};
///
/// let mut battle = BattleStateMachine::new(&BattleConfig::default());
/// battle.initialize();
/// battle.increment_turn().unwrap();
/// battle.apply_damage(0, 60).unwrap();
///
/// assert_eq!(battle.health(Side::Opponent), 140);
/// assert!(battle.check_game_over().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStateMachine {
    starting_health: i32,
    max_turns: u32,
    phase: BattlePhase,
    health: SideMap<i32>,
    turn: u32,
    player_card: Option<CommittedCard>,
}

impl BattleStateMachine {
    /// Create a battle that has not started yet.
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            starting_health: config.starting_health,
            max_turns: config.max_turns,
            phase: BattlePhase::NotStarted,
            health: SideMap::with_value(config.starting_health),
            turn: 0,
            player_card: None,
        }
    }

    /// Start (or restart) the battle: full health, turn zero, no card.
    pub fn initialize(&mut self) {
        self.phase = BattlePhase::InProgress;
        self.health = SideMap::with_value(self.starting_health);
        self.turn = 0;
        self.player_card = None;
        tracing::info!(health = self.starting_health, max_turns = self.max_turns, "battle started");
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.phase == BattlePhase::InProgress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished(_))
    }

    /// The result, once finished.
    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn health(&self, side: Side) -> i32 {
        self.health[side]
    }

    #[must_use]
    pub fn healths(&self) -> SideMap<i32> {
        self.health
    }

    /// Completed exchanges so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    #[must_use]
    pub fn player_card(&self) -> Option<&CommittedCard> {
        self.player_card.as_ref()
    }

    pub fn set_player_card(&mut self, card: Option<CommittedCard>) {
        self.player_card = card;
    }

    /// True while another turn may be played.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.is_in_progress()
            && self.turn < self.max_turns
            && self.health.iter().all(|(_, &h)| h > 0)
    }

    // === Mutations ===

    /// Count one more exchange. Only valid while in progress.
    pub fn increment_turn(&mut self) -> Result<u32, BattleError> {
        self.require_in_progress("increment turn")?;
        self.turn += 1;
        Ok(self.turn)
    }

    /// Subtract damage taken by each side, flooring health at zero.
    pub fn apply_damage(
        &mut self,
        damage_to_player: i32,
        damage_to_opponent: i32,
    ) -> Result<(), BattleError> {
        let health = self.health;
        self.apply_exchange(health, SideMap::new(damage_to_player, damage_to_opponent))
    }

    /// Set each side's health to `health[side] - damage[side]`, floored at
    /// zero.
    ///
    /// `health` carries any skill-adjusted totals (health boosts) computed
    /// before damage lands. Nothing is written unless every input is valid.
    pub fn apply_exchange(
        &mut self,
        health: SideMap<i32>,
        damage: SideMap<i32>,
    ) -> Result<(), BattleError> {
        self.require_in_progress("apply damage")?;
        if damage.iter().any(|(_, &d)| d < 0) {
            return Err(BattleError::invalid("apply damage", "damage must be non-negative"));
        }

        self.health = health.map(|side, h| h.saturating_sub(damage[side]).max(0));
        Ok(())
    }

    /// Evaluate the win conditions.
    ///
    /// Returns the outcome only on the call that finishes the battle;
    /// afterwards, and before the battle starts, it returns `None`.
    pub fn check_game_over(&mut self) -> Option<BattleOutcome> {
        if !self.is_in_progress() {
            return None;
        }

        let player = self.health[Side::Player];
        let opponent = self.health[Side::Opponent];

        let outcome = if player <= 0 {
            BattleOutcome {
                winner: Some(Side::Opponent),
                reason: FinishReason::HealthDepleted,
            }
        } else if opponent <= 0 {
            BattleOutcome {
                winner: Some(Side::Player),
                reason: FinishReason::HealthDepleted,
            }
        } else if self.turn >= self.max_turns {
            let winner = match player.cmp(&opponent) {
                std::cmp::Ordering::Greater => Some(Side::Player),
                std::cmp::Ordering::Less => Some(Side::Opponent),
                std::cmp::Ordering::Equal => None,
            };
            BattleOutcome {
                winner,
                reason: FinishReason::TurnLimit {
                    player_health: player,
                    opponent_health: opponent,
                    turns: self.max_turns,
                },
            }
        } else {
            return None;
        };

        self.phase = BattlePhase::Finished(outcome);
        tracing::info!(message = %outcome.message(), turn = self.turn, "battle finished");
        Some(outcome)
    }

    fn require_in_progress(&self, operation: &'static str) -> Result<(), BattleError> {
        match self.phase {
            BattlePhase::InProgress => Ok(()),
            BattlePhase::NotStarted => {
                Err(BattleError::invalid(operation, "battle has not started"))
            }
            BattlePhase::Finished(_) => Err(BattleError::invalid(operation, "battle is finished")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn started() -> BattleStateMachine {
        let mut battle = BattleStateMachine::new(&BattleConfig::default());
        battle.initialize();
        battle
    }

    #[test]
    fn test_initial_state() {
        let battle = BattleStateMachine::new(&BattleConfig::default());
        assert_eq!(battle.phase(), BattlePhase::NotStarted);
        assert!(!battle.can_continue());

        let battle = started();
        assert!(battle.is_in_progress());
        assert_eq!(battle.healths(), SideMap::new(200, 200));
        assert_eq!(battle.turn(), 0);
        assert!(battle.can_continue());
    }

    #[test]
    fn test_mutations_rejected_before_start() {
        let mut battle = BattleStateMachine::new(&BattleConfig::default());
        assert!(battle.increment_turn().unwrap_err().is_invalid_state());
        assert!(battle.apply_damage(10, 10).unwrap_err().is_invalid_state());
        assert_eq!(battle.check_game_over(), None);
        assert_eq!(battle.phase(), BattlePhase::NotStarted);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut battle = started();
        battle.apply_damage(250, 30).unwrap();
        assert_eq!(battle.health(Side::Player), 0);
        assert_eq!(battle.health(Side::Opponent), 170);
    }

    #[test]
    fn test_negative_damage_rejected_without_mutation() {
        let mut battle = started();
        let err = battle.apply_damage(10, -5).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(battle.healths(), SideMap::new(200, 200));
    }

    #[test]
    fn test_apply_exchange_uses_adjusted_health() {
        let mut battle = started();
        battle.apply_exchange(SideMap::new(230, 200), SideMap::new(40, 15)).unwrap();
        assert_eq!(battle.healths(), SideMap::new(190, 185));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let config = BattleConfig::default().with_starting_health(i32::MAX);
        let mut battle = BattleStateMachine::new(&config);
        battle.initialize();

        battle
            .apply_exchange(SideMap::new(i32::MAX, i32::MIN), SideMap::new(0, i32::MAX))
            .unwrap();
        assert_eq!(battle.healths(), SideMap::new(i32::MAX, 0));
    }

    #[test]
    fn test_player_depleted_first() {
        let mut battle = started();
        battle.apply_damage(200, 200).unwrap();

        let outcome = battle.check_game_over().unwrap();
        assert_eq!(outcome.winner, Some(Side::Opponent));
        assert_eq!(outcome.reason, FinishReason::HealthDepleted);
    }

    #[test]
    fn test_opponent_depleted() {
        let mut battle = started();
        battle.apply_damage(10, 500).unwrap();

        let outcome = battle.check_game_over().unwrap();
        assert_eq!(outcome.message(), "PLAYER WINS!\nAI health reached 0");
        assert!(battle.is_finished());
    }

    #[test]
    fn test_turn_limit_scoring() {
        let mut battle = started();
        for _ in 0..5 {
            battle.increment_turn().unwrap();
            assert_eq!(battle.check_game_over(), None);
        }
        battle.increment_turn().unwrap();
        battle.apply_damage(50, 80).unwrap();

        let outcome = battle.check_game_over().unwrap();
        assert_eq!(outcome.message(), "PLAYER WINS!\n150 vs 120 health after 6 turns");
        assert!(!battle.can_continue());
    }

    #[test]
    fn test_turn_limit_draw() {
        let mut battle = started();
        for _ in 0..6 {
            battle.increment_turn().unwrap();
        }
        let outcome = battle.check_game_over().unwrap();
        assert!(outcome.is_draw());
        assert_eq!(outcome.message(), "DRAW!\nBoth have 200 health after 6 turns");
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut battle = started();
        battle.apply_damage(0, 200).unwrap();

        assert!(battle.check_game_over().is_some());
        assert_eq!(battle.check_game_over(), None);
        assert_eq!(battle.check_game_over(), None);
        assert!(battle.is_finished());
        assert!(battle.increment_turn().is_err());
    }

    #[test]
    fn test_restart_after_finish() {
        let mut battle = started();
        battle.set_player_card(Some(CommittedCard {
            slot: SlotId::new(0),
            card: CardData::new(CardKind::Kane, 45, 20),
        }));
        battle.apply_damage(0, 200).unwrap();
        battle.check_game_over();

        battle.initialize();
        assert!(battle.is_in_progress());
        assert_eq!(battle.healths(), SideMap::new(200, 200));
        assert_eq!(battle.turn(), 0);
        assert!(battle.player_card().is_none());
        assert_eq!(battle.outcome(), None);
    }
}

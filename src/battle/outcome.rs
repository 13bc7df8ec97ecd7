//! Battle results.

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Why the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// The losing side's health reached zero.
    HealthDepleted,
    /// The turn limit was reached; the result is decided on health.
    TurnLimit {
        player_health: i32,
        opponent_health: i32,
        turns: u32,
    },
}

/// Result of a finished battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// `None` for a draw.
    pub winner: Option<Side>,
    pub reason: FinishReason,
}

impl BattleOutcome {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        self.winner == Some(side)
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// The game-over text shown to the player.
    ///
    /// ```
    /// use card_duel::battle::{BattleOutcome, FinishReason};
    /// use card_duel::core::Side;
    ///
    /// let outcome = BattleOutcome {
    ///     winner: Some(Side::Player),
    ///     reason: FinishReason::HealthDepleted,
    /// };
    /// assert_eq!(outcome.message(), "PLAYER WINS!\nAI health reached 0");
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        match (self.winner, self.reason) {
            (Some(Side::Player), FinishReason::HealthDepleted) => {
                "PLAYER WINS!\nAI health reached 0".to_string()
            }
            (Some(Side::Opponent), FinishReason::HealthDepleted) => {
                "AI WINS!\nPlayer health reached 0".to_string()
            }
            (
                Some(Side::Player),
                FinishReason::TurnLimit {
                    player_health,
                    opponent_health,
                    turns,
                },
            ) => format!(
                "PLAYER WINS!\n{player_health} vs {opponent_health} health after {turns} turns"
            ),
            (
                Some(Side::Opponent),
                FinishReason::TurnLimit {
                    player_health,
                    opponent_health,
                    turns,
                },
            ) => format!(
                "AI WINS!\n{opponent_health} vs {player_health} health after {turns} turns"
            ),
            (None, FinishReason::TurnLimit { player_health, turns, .. }) => {
                format!("DRAW!\nBoth have {player_health} health after {turns} turns")
            }
            // Both sides at zero is scored as an opponent win before this can arise.
            (None, FinishReason::HealthDepleted) => {
                "DRAW!\nBoth sides reached 0 health".to_string()
            }
        }
    }
}

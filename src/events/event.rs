//! Battle event types.
//!
//! Events are immutable notifications carrying only the data their
//! subscribers need. Requests flow in from input/UI collaborators
//! (`UseSkillRequested`, `EndTurnRequested`, ...); results flow back out
//! to presentation (`HealthChanged`, `GameFinished`, ...).

use serde::{Deserialize, Serialize};

use crate::cards::{CardData, SlotId};

/// Discriminant used to key subscriptions.
///
/// Every `BattleEvent` variant has exactly one `EventKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    UseSkillRequested,
    EndTurnRequested,
    RetryGameRequested,
    CardPlacedOnTarget,
    CardRemovedFromTarget,
    HealthChanged,
    SkillsDisplayed,
    SkillDisplayCleared,
    OpponentCardCommitted,
    TurnResolved,
    GameFinished,
    ButtonsInteractableChanged,
    ResetDeckRequested,
    ReturnToDeckSelectionRequested,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::UseSkillRequested,
        EventKind::EndTurnRequested,
        EventKind::RetryGameRequested,
        EventKind::CardPlacedOnTarget,
        EventKind::CardRemovedFromTarget,
        EventKind::HealthChanged,
        EventKind::SkillsDisplayed,
        EventKind::SkillDisplayCleared,
        EventKind::OpponentCardCommitted,
        EventKind::TurnResolved,
        EventKind::GameFinished,
        EventKind::ButtonsInteractableChanged,
        EventKind::ResetDeckRequested,
        EventKind::ReturnToDeckSelectionRequested,
    ];

    /// True for events the battle core consumes rather than publishes.
    #[must_use]
    pub fn is_request(self) -> bool {
        matches!(
            self,
            EventKind::UseSkillRequested
                | EventKind::EndTurnRequested
                | EventKind::RetryGameRequested
                | EventKind::CardPlacedOnTarget
                | EventKind::CardRemovedFromTarget
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A battle notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    // === Consumed by the core ===
    /// Draw and activate one random skill per side.
    UseSkillRequested,

    /// Resolve the current turn.
    EndTurnRequested,

    /// Reset health, turn, effects and cards; go back to deck selection.
    RetryGameRequested,

    /// The human side committed a card through a drop target.
    CardPlacedOnTarget { slot: SlotId, card: CardData },

    /// A card was taken back off a drop target.
    CardRemovedFromTarget { slot: SlotId, card: CardData },

    // === Published by the core ===
    HealthChanged {
        player_health: i32,
        opponent_health: i32,
    },

    SkillsDisplayed {
        player_description: String,
        opponent_description: String,
    },

    SkillDisplayCleared,

    /// The opponent's card for the current turn.
    OpponentCardCommitted { card: CardData },

    /// Net damage each side dealt this turn, after shields.
    TurnResolved {
        turn: u32,
        player_damage: i32,
        opponent_damage: i32,
    },

    /// Outcome message, e.g. `"PLAYER WINS!\nAI health reached 0"`.
    GameFinished { message: String },

    ButtonsInteractableChanged { interactable: bool },

    ResetDeckRequested,

    ReturnToDeckSelectionRequested,
}

impl BattleEvent {
    /// The subscription key for this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            BattleEvent::UseSkillRequested => EventKind::UseSkillRequested,
            BattleEvent::EndTurnRequested => EventKind::EndTurnRequested,
            BattleEvent::RetryGameRequested => EventKind::RetryGameRequested,
            BattleEvent::CardPlacedOnTarget { .. } => EventKind::CardPlacedOnTarget,
            BattleEvent::CardRemovedFromTarget { .. } => EventKind::CardRemovedFromTarget,
            BattleEvent::HealthChanged { .. } => EventKind::HealthChanged,
            BattleEvent::SkillsDisplayed { .. } => EventKind::SkillsDisplayed,
            BattleEvent::SkillDisplayCleared => EventKind::SkillDisplayCleared,
            BattleEvent::OpponentCardCommitted { .. } => EventKind::OpponentCardCommitted,
            BattleEvent::TurnResolved { .. } => EventKind::TurnResolved,
            BattleEvent::GameFinished { .. } => EventKind::GameFinished,
            BattleEvent::ButtonsInteractableChanged { .. } => {
                EventKind::ButtonsInteractableChanged
            }
            BattleEvent::ResetDeckRequested => EventKind::ResetDeckRequested,
            BattleEvent::ReturnToDeckSelectionRequested => {
                EventKind::ReturnToDeckSelectionRequested
            }
        }
    }

    /// Create a health update event.
    pub fn health(player_health: i32, opponent_health: i32) -> Self {
        Self::HealthChanged {
            player_health,
            opponent_health,
        }
    }

    /// Create a skill display event.
    pub fn skills(player: impl Into<String>, opponent: impl Into<String>) -> Self {
        Self::SkillsDisplayed {
            player_description: player.into(),
            opponent_description: opponent.into(),
        }
    }

    pub fn buttons(interactable: bool) -> Self {
        Self::ButtonsInteractableChanged { interactable }
    }
}

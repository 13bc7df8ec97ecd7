//! Turn coordination.
//!
//! The controller sequences a turn without computing any rule itself:
//! skills come from the `SkillService`, damage from `Exchange`, health and
//! win conditions from the `BattleStateMachine`. Results are published on
//! the event bus for presentation.

use std::rc::Rc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleOutcome, BattleStateMachine, CommittedCard, Exchange};
use crate::cards::{CardData, SlotId};
use crate::core::{BattleConfig, BattleError, Side, SideMap};
use crate::events::{BattleEvent, EventBus};
use crate::skills::{SkillConfig, SkillEngine, SkillService};

use super::opponent::OpponentProvider;
use super::scheduler::SettleScheduler;

/// Everything that happened in one resolved exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number after the increment.
    pub turn: u32,
    /// The two cards that fought.
    pub cards: SideMap<CardData>,
    /// Effective stats and raw damage.
    pub exchange: Exchange,
    /// Damage each side actually took, after its shield.
    pub damage_taken: SideMap<i32>,
    /// Health after the exchange.
    pub health: SideMap<i32>,
}

/// Continuation run once the settle delay has passed.
#[derive(Clone, Copy, Debug)]
struct SettleTask {
    turn: u32,
}

/// Orchestrates skill use, turn resolution and battle resets.
pub struct TurnController<S: SkillService = SkillEngine> {
    bus: Rc<EventBus>,
    skills: S,
    battle: BattleStateMachine,
    opponent: Box<dyn OpponentProvider>,
    placements: FxHashMap<SlotId, CardData>,
    opponent_card: Option<CardData>,
    scheduler: SettleScheduler<SettleTask>,
    settle_delay: Duration,
}

impl<S: SkillService> TurnController<S> {
    /// Create a controller. The battle is not started until
    /// `start_battle` is called.
    pub fn new(
        config: &BattleConfig,
        bus: Rc<EventBus>,
        skills: S,
        opponent: Box<dyn OpponentProvider>,
    ) -> Self {
        Self {
            bus,
            skills,
            battle: BattleStateMachine::new(config),
            opponent,
            placements: FxHashMap::default(),
            opponent_card: None,
            scheduler: SettleScheduler::new(),
            settle_delay: config.settle_delay(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn battle(&self) -> &BattleStateMachine {
        &self.battle
    }

    #[must_use]
    pub fn skills(&self) -> &S {
        &self.skills
    }

    /// The opponent card on the table, between resolution and settle.
    #[must_use]
    pub fn opponent_card(&self) -> Option<CardData> {
        self.opponent_card
    }

    /// True between `end_turn` and its settle continuation.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Battle generation; bumped on every reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    /// Logical time elapsed through `advance`.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    // === Lifecycle ===

    /// Begin a fresh battle.
    pub fn start_battle(&mut self) {
        self.reset_battle();
    }

    /// Full reset, then ask deck management to take over again.
    ///
    /// Any settle continuation still pending is invalidated and will not
    /// touch the new battle.
    pub fn retry(&mut self) {
        self.reset_battle();
        self.bus.publish(BattleEvent::ResetDeckRequested);
        self.bus.publish(BattleEvent::ReturnToDeckSelectionRequested);
    }

    fn reset_battle(&mut self) {
        let generation = self.scheduler.invalidate();
        self.placements.clear();
        self.opponent_card = None;
        self.skills.clear_effects();
        self.battle.initialize();
        tracing::info!(generation, "battle reset");

        let health = self.battle.healths();
        self.bus.publish(BattleEvent::health(health[Side::Player], health[Side::Opponent]));
        self.bus.publish(BattleEvent::SkillDisplayCleared);
        self.bus.publish(BattleEvent::buttons(true));
    }

    // === Card placement ===

    /// Commit `card` for the human side through `slot`.
    pub fn place_card(&mut self, slot: SlotId, card: CardData) -> Result<(), BattleError> {
        if self.is_resolving() {
            return Err(BattleError::invalid("place card", "turn is resolving"));
        }
        self.placements.insert(slot, card);
        self.battle.set_player_card(Some(CommittedCard { slot, card }));
        tracing::debug!(%slot, %card, "card placed");
        Ok(())
    }

    /// Take a card back off `slot`.
    ///
    /// If it was the committed card, the lowest remaining slot (if any)
    /// becomes committed instead.
    pub fn remove_card(&mut self, slot: SlotId) -> Result<(), BattleError> {
        if self.is_resolving() {
            return Err(BattleError::invalid("remove card", "turn is resolving"));
        }
        if self.placements.remove(&slot).is_none() {
            return Err(BattleError::invalid("remove card", "slot holds no card"));
        }

        if self.battle.player_card().map(|c| c.slot) == Some(slot) {
            let fallback = self
                .placements
                .iter()
                .min_by_key(|(s, _)| s.raw())
                .map(|(&slot, &card)| CommittedCard { slot, card });
            self.battle.set_player_card(fallback);
        }
        tracing::debug!(%slot, "card removed");
        Ok(())
    }

    // === Skills ===

    /// Draw one random skill per side and activate both.
    pub fn use_skill(&mut self) -> Result<(SkillConfig, SkillConfig), BattleError> {
        self.require_turn_open("use skill")?;

        let player = self.skills.random_skill();
        let opponent = self.skills.random_skill();
        self.activate_skills(Some(&player), Some(&opponent))?;
        Ok((player, opponent))
    }

    /// Activate chosen skills. `None` leaves that side without a skill
    /// this turn.
    pub fn activate_skills(
        &mut self,
        player: Option<&SkillConfig>,
        opponent: Option<&SkillConfig>,
    ) -> Result<(), BattleError> {
        self.require_turn_open("use skill")?;

        for (side, skill) in [(Side::Player, player), (Side::Opponent, opponent)] {
            if let Some(skill) = skill {
                self.skills.activate_skill(skill, side);
            }
        }

        let describe = |skill: Option<&SkillConfig>| {
            skill.map(|s| s.description.clone()).unwrap_or_default()
        };
        self.bus.publish(BattleEvent::skills(describe(player), describe(opponent)));
        Ok(())
    }

    // === Turn resolution ===

    /// Resolve the current turn and schedule its settle continuation.
    pub fn end_turn(&mut self) -> Result<TurnReport, BattleError> {
        if self.is_resolving() {
            return Err(BattleError::invalid("end turn", "turn is already resolving"));
        }
        if !self.battle.can_continue() {
            let reason = if self.battle.is_finished() {
                "battle is finished"
            } else if !self.battle.is_in_progress() {
                "battle has not started"
            } else {
                "turn limit reached"
            };
            return Err(BattleError::invalid("end turn", reason));
        }

        // Gather every input before anything is mutated.
        let player_card = self
            .battle
            .player_card()
            .map(|c| c.card)
            .ok_or(BattleError::MissingCard(Side::Player))?;
        let opponent_card = self
            .opponent
            .provide_opponent_card()
            .ok_or(BattleError::MissingCard(Side::Opponent))?;

        let cards = SideMap::new(player_card, opponent_card);
        let exchange = Exchange::compute(&self.skills, cards);
        let adjusted = SideMap::from_fn(|side| {
            self.skills
                .apply_health_effects(self.battle.health(side), exchange.incoming(side), side)
        });
        let boosted = adjusted.map(|_, (health, _)| health);
        let damage_taken = adjusted.map(|_, (_, damage)| damage);

        self.bus.publish(BattleEvent::buttons(false));
        let turn = self.battle.increment_turn()?;
        self.opponent_card = Some(opponent_card);
        self.bus.publish(BattleEvent::OpponentCardCommitted { card: opponent_card });

        self.battle.apply_exchange(boosted, damage_taken)?;
        let health = self.battle.healths();

        tracing::debug!(
            turn,
            player_attack = exchange.attack[Side::Player],
            opponent_attack = exchange.attack[Side::Opponent],
            player_taken = damage_taken[Side::Player],
            opponent_taken = damage_taken[Side::Opponent],
            "turn resolved"
        );

        self.bus.publish(BattleEvent::health(health[Side::Player], health[Side::Opponent]));
        self.bus.publish(BattleEvent::TurnResolved {
            turn,
            player_damage: damage_taken[Side::Opponent],
            opponent_damage: damage_taken[Side::Player],
        });

        self.scheduler.schedule(self.settle_delay, SettleTask { turn });

        Ok(TurnReport {
            turn,
            cards,
            exchange,
            damage_taken,
            health,
        })
    }

    /// Move the logical clock forward and run due settle continuations.
    ///
    /// Returns the outcome if a continuation finished the battle.
    pub fn advance(&mut self, elapsed: Duration) -> Option<BattleOutcome> {
        let mut finished = None;
        for task in self.scheduler.advance(elapsed) {
            if let Some(outcome) = self.settle(task) {
                finished = Some(outcome);
            }
        }
        finished
    }

    /// Clear the table, roll effects over and evaluate game over.
    fn settle(&mut self, task: SettleTask) -> Option<BattleOutcome> {
        tracing::debug!(turn = task.turn, "settling turn");

        if let Some(committed) = self.battle.player_card().copied() {
            self.placements.remove(&committed.slot);
        }
        self.battle.set_player_card(None);
        self.opponent_card = None;

        self.skills.reset_turn_effects();
        self.bus.publish(BattleEvent::SkillDisplayCleared);

        match self.battle.check_game_over() {
            Some(outcome) => {
                self.bus.publish(BattleEvent::GameFinished {
                    message: outcome.message(),
                });
                self.bus.publish(BattleEvent::buttons(false));
                Some(outcome)
            }
            None => {
                self.bus.publish(BattleEvent::buttons(true));
                None
            }
        }
    }

    fn require_turn_open(&self, operation: &'static str) -> Result<(), BattleError> {
        if self.is_resolving() {
            return Err(BattleError::invalid(operation, "turn is resolving"));
        }
        if !self.battle.is_in_progress() {
            return Err(BattleError::invalid(operation, "battle is not in progress"));
        }
        Ok(())
    }
}

impl<S: SkillService> std::fmt::Debug for TurnController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("battle", &self.battle)
            .field("placements", &self.placements)
            .field("opponent_card", &self.opponent_card)
            .field("generation", &self.scheduler.generation())
            .field("resolving", &self.is_resolving())
            .finish_non_exhaustive()
    }
}

//! # card-duel
//!
//! Turn-based card battle core: two sides, one committed card each per
//! turn, random skills that modify the exchange, and an event bus that
//! decouples the rules from whatever presents them.
//!
//! ## Design
//!
//! 1. **Explicit composition**: The bus, skill engine and controller are
//!    plain values wired together by [`session::BattleSession`]. There are
//!    no global registries or singletons.
//!
//! 2. **Simultaneous exchange**: Both sides' damage is computed from the
//!    same pre-turn state before either total changes.
//!
//! 3. **Logical time**: The pause after a turn is a scheduled continuation
//!    on a logical clock, driven by the host through `advance`. A reset
//!    invalidates every continuation scheduled before it.
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, configuration, errors
//! - `cards`: Card stats and the card catalog
//! - `events`: Event vocabulary and the publish/subscribe bus
//! - `skills`: Skill catalog, effect storage, stat modifiers
//! - `battle`: Health, turn counter, win conditions, damage
//! - `turn`: Turn orchestration and the settle scheduler
//! - `session`: Composition root wiring requests to the controller

pub mod core;
pub mod cards;
pub mod events;
pub mod skills;
pub mod battle;
pub mod turn;
pub mod session;

// Re-export commonly used types
pub use crate::core::{BattleConfig, BattleError, GameRng, Side, SideMap};

pub use crate::cards::{CardCatalog, CardData, CardKind, SlotId};

pub use crate::events::{BattleEvent, Delivery, EventBus, EventKind, SubscriptionId};

pub use crate::skills::{SkillConfig, SkillEngine, SkillKind, SkillService};

pub use crate::battle::{BattleOutcome, BattlePhase, BattleStateMachine, Exchange, FinishReason};

pub use crate::turn::{OpponentProvider, RandomOpponent, TurnController, TurnReport};

pub use crate::session::BattleSession;

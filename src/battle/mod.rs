//! Battle rules: health, turns, win conditions and damage.
//!
//! - [`BattleStateMachine`]: `NotStarted -> InProgress -> Finished`, with
//!   health floored at zero and game-over reported exactly once
//! - [`Exchange`]: Simultaneous damage computation for one turn
//! - [`BattleOutcome`]: Winner, reason and the game-over message

mod state;
mod outcome;
mod damage;

pub use state::{BattlePhase, BattleStateMachine, CommittedCard};
pub use outcome::{BattleOutcome, FinishReason};
pub use damage::{damage, Exchange};

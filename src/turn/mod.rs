//! Turn orchestration.
//!
//! - [`TurnController`]: Sequences skill use, turn resolution, the settle
//!   continuation and resets
//! - [`SettleScheduler`]: Logical-clock continuations with a generation
//!   token, so a reset during the settle pause discards stale work
//! - [`OpponentProvider`]: Where the opponent's card comes from

mod controller;
mod scheduler;
mod opponent;

pub use controller::{TurnController, TurnReport};
pub use scheduler::SettleScheduler;
pub use opponent::{OpponentProvider, RandomOpponent};

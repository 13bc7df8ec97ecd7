//! Core battle types: sides, RNG, configuration and errors.
//!
//! Everything here is independent of cards, skills and events; the other
//! modules build on these.

pub mod side;
pub mod rng;
pub mod config;
pub mod error;

pub use side::{Side, SideMap};
pub use rng::GameRng;
pub use config::{BattleConfig, DEFAULT_MAX_TURNS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_STARTING_HEALTH};
pub use error::BattleError;

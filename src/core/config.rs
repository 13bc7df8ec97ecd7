//! Battle configuration.
//!
//! The engine reads every tunable rule constant from `BattleConfig`:
//! starting health, turn limit, presentation settle delay and RNG seed.
//! Configs can be built in code with the `with_*` builders or parsed from
//! TOML, where missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::BattleError;

/// Starting health for each side.
pub const DEFAULT_STARTING_HEALTH: i32 = 200;

/// Number of completed exchanges after which the battle is scored.
pub const DEFAULT_MAX_TURNS: u32 = 6;

/// Pause between damage application and card removal.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3000;

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Health each side starts (and restarts) with.
    pub starting_health: i32,

    /// Turn limit; reaching it ends the battle on points.
    pub max_turns: u32,

    /// Settle delay in milliseconds. Presentation only, never a rule.
    pub settle_delay_ms: u64,

    /// Seed for skill draws and opponent card picks.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            starting_health: DEFAULT_STARTING_HEALTH,
            max_turns: DEFAULT_MAX_TURNS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            seed: 42,
        }
    }
}

impl BattleConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, BattleError> {
        let config: Self =
            toml::from_str(source).map_err(|e| BattleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the rule constants describe a playable battle.
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.starting_health <= 0 {
            return Err(BattleError::Config(format!(
                "starting_health must be positive, got {}",
                self.starting_health
            )));
        }
        if self.max_turns == 0 {
            return Err(BattleError::Config("max_turns must be at least 1".into()));
        }
        Ok(())
    }

    /// The settle delay as a `Duration`.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

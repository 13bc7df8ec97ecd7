//! Error types shared by every battle component.

use thiserror::Error;

use super::Side;

/// Errors produced by battle operations.
///
/// None of these leave battle state partially updated: every operation
/// validates its inputs before mutating health or the turn counter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// An operation was requested in a state where it has no meaning.
    #[error("cannot {operation}: {reason}")]
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },

    /// No card is committed for a side when the turn resolves.
    #[error("no card committed for {0}")]
    MissingCard(Side),

    /// The card catalog has no cards to draw from.
    #[error("card catalog is empty")]
    EmptyCatalog,

    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An event subscriber failed.
    #[error("handler failed: {0}")]
    Handler(String),

    /// A session operation was called from a handler while the
    /// controller was busy.
    #[error("{0} called while the controller is busy")]
    Reentrant(&'static str),
}

impl BattleError {
    pub(crate) const fn invalid(operation: &'static str, reason: &'static str) -> Self {
        Self::InvalidState { operation, reason }
    }

    /// True for precondition failures that callers treat as no-ops.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BattleError::invalid("end turn", "battle is finished");
        assert_eq!(err.to_string(), "cannot end turn: battle is finished");
        assert!(err.is_invalid_state());

        let err = BattleError::MissingCard(Side::Player);
        assert_eq!(err.to_string(), "no card committed for Player");
        assert!(!err.is_invalid_state());
    }
}

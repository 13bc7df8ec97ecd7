//! Opponent card selection.

use crate::cards::{CardCatalog, CardData};
use crate::core::GameRng;

/// Supplies the opponent's card for each turn.
///
/// Returning `None` means the card could not be produced; the turn is
/// skipped rather than resolved against nothing.
pub trait OpponentProvider {
    fn provide_opponent_card(&mut self) -> Option<CardData>;
}

/// Closures work as providers, which keeps scripted opponents short.
impl<F> OpponentProvider for F
where
    F: FnMut() -> Option<CardData>,
{
    fn provide_opponent_card(&mut self) -> Option<CardData> {
        self()
    }
}

/// Picks a uniformly random card from a catalog every turn.
#[derive(Clone, Debug)]
pub struct RandomOpponent {
    catalog: CardCatalog,
    rng: GameRng,
}

impl RandomOpponent {
    #[must_use]
    pub fn new(catalog: CardCatalog, rng: GameRng) -> Self {
        Self { catalog, rng }
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }
}

impl OpponentProvider for RandomOpponent {
    fn provide_opponent_card(&mut self) -> Option<CardData> {
        let card = self.catalog.random_card(&mut self.rng)?;
        tracing::debug!(%card, "opponent picked card");
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    #[test]
    fn test_random_opponent_draws_from_catalog() {
        let catalog = CardCatalog::standard();
        let mut opponent = RandomOpponent::new(catalog.clone(), GameRng::new(5));
        for _ in 0..10 {
            let card = opponent.provide_opponent_card().unwrap();
            assert!(catalog.contains(&card));
        }
    }

    #[test]
    fn test_random_opponent_empty_catalog() {
        let mut opponent = RandomOpponent::new(CardCatalog::new(), GameRng::new(5));
        assert_eq!(opponent.provide_opponent_card(), None);
    }

    #[test]
    fn test_closure_provider() {
        let mut cards = vec![CardData::new(CardKind::Salah, 48, 19)];
        let mut provider = move || cards.pop();

        assert!(provider.provide_opponent_card().is_some());
        assert!(provider.provide_opponent_card().is_none());
    }
}

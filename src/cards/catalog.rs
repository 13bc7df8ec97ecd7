//! Card catalog.
//!
//! The `CardCatalog` is the collection cards are drawn from: the opponent
//! draws one per turn, deck building draws a hand of distinct cards.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::data::{CardData, CardKind};

/// Ordered collection of cards.
///
/// ## Example
///
/// ```
/// use card_duel::cards::{CardCatalog, CardData, CardKind};
/// use card_duel::core::GameRng;
///
/// let mut catalog = CardCatalog::new();
/// catalog.add(CardData::new(CardKind::Messi, 50, 20));
///
/// let mut rng = GameRng::new(1);
/// assert_eq!(catalog.random_card(&mut rng).unwrap().kind(), CardKind::Messi);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCatalog {
    cards: Vec<CardData>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock collection: one card per `CardKind`.
    #[must_use]
    pub fn standard() -> Self {
        let stats = [
            (CardKind::Messi, 55, 20),
            (CardKind::Ronaldo, 58, 18),
            (CardKind::Neymar, 50, 15),
            (CardKind::Mbappe, 54, 16),
            (CardKind::Hazard, 44, 20),
            (CardKind::Salah, 48, 19),
            (CardKind::Modric, 38, 30),
            (CardKind::Kane, 46, 24),
            (CardKind::DeBruyne, 42, 26),
            (CardKind::ArdaTuran, 36, 28),
        ];
        stats
            .into_iter()
            .map(|(kind, attack, defense)| CardData::new(kind, attack, defense))
            .collect()
    }

    pub fn add(&mut self, card: CardData) {
        self.cards.push(card);
    }

    /// Remove the first card equal to `card`.
    ///
    /// Returns `false` if no such card exists.
    pub fn remove(&mut self, card: &CardData) -> bool {
        match self.cards.iter().position(|c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CardData> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn contains(&self, card: &CardData) -> bool {
        self.cards.contains(card)
    }

    /// Find the first card of a kind.
    #[must_use]
    pub fn find_kind(&self, kind: CardKind) -> Option<&CardData> {
        self.cards.iter().find(|c| c.kind() == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardData> {
        self.cards.iter()
    }

    /// Pick a uniformly random card. `None` if the catalog is empty.
    pub fn random_card(&self, rng: &mut GameRng) -> Option<CardData> {
        if self.cards.is_empty() {
            tracing::warn!("cannot draw a random card from an empty catalog");
        }
        rng.choose(&self.cards).copied()
    }

    /// Pick up to `count` distinct cards in random order.
    ///
    /// Asking for more cards than the catalog holds returns all of them.
    pub fn random_cards(&self, count: usize, rng: &mut GameRng) -> Vec<CardData> {
        if count > self.cards.len() {
            tracing::warn!(
                requested = count,
                available = self.cards.len(),
                "requested more cards than the catalog holds"
            );
        }
        rng.sample_indices(self.cards.len(), count)
            .into_iter()
            .map(|i| self.cards[i])
            .collect()
    }
}

impl FromIterator<CardData> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardData>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

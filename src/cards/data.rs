//! Card values.
//!
//! `CardData` is a small copyable value: which card it is plus its attack
//! and defense. Stats are never negative; they clamp to zero on
//! construction and on mutation.

use serde::{Deserialize, Serialize};

/// The closed set of cards in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardKind {
    Messi,
    Ronaldo,
    Neymar,
    Mbappe,
    Hazard,
    Salah,
    Modric,
    Kane,
    DeBruyne,
    ArdaTuran,
}

impl CardKind {
    /// Every card kind, in declaration order.
    pub const ALL: [CardKind; 10] = [
        CardKind::Messi,
        CardKind::Ronaldo,
        CardKind::Neymar,
        CardKind::Mbappe,
        CardKind::Hazard,
        CardKind::Salah,
        CardKind::Modric,
        CardKind::Kane,
        CardKind::DeBruyne,
        CardKind::ArdaTuran,
    ];
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A card's identity and combat stats.
///
/// ```
/// use card_duel::cards::{CardData, CardKind};
///
/// let mut card = CardData::new(CardKind::Kane, 45, -5);
/// assert_eq!(card.defense(), 0);
///
/// card.set_attack(-10);
/// assert_eq!(card.attack(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CardRecord", into = "CardRecord")]
pub struct CardData {
    kind: CardKind,
    attack: i32,
    defense: i32,
}

/// Wire form of `CardData`; deserializing goes through `CardData::new`.
#[derive(Serialize, Deserialize)]
struct CardRecord {
    kind: CardKind,
    attack: i32,
    defense: i32,
}

impl From<CardRecord> for CardData {
    fn from(record: CardRecord) -> Self {
        CardData::new(record.kind, record.attack, record.defense)
    }
}

impl From<CardData> for CardRecord {
    fn from(card: CardData) -> Self {
        CardRecord {
            kind: card.kind,
            attack: card.attack,
            defense: card.defense,
        }
    }
}

impl CardData {
    /// Create a card, clamping negative stats to zero.
    #[must_use]
    pub fn new(kind: CardKind, attack: i32, defense: i32) -> Self {
        Self {
            kind,
            attack: attack.max(0),
            defense: defense.max(0),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.kind
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        self.attack
    }

    #[must_use]
    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn set_kind(&mut self, kind: CardKind) {
        self.kind = kind;
    }

    /// Set attack, clamped to zero.
    pub fn set_attack(&mut self, attack: i32) {
        self.attack = attack.max(0);
    }

    /// Set defense, clamped to zero.
    pub fn set_defense(&mut self, defense: i32) {
        self.defense = defense.max(0);
    }
}

impl std::fmt::Display for CardData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} ATK / {} DEF)", self.kind, self.attack, self.defense)
    }
}

/// Identifier of a drop target a card can be placed on.
///
/// Slots are side-neutral; the controller only tracks which card the
/// human side has committed through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u8);

impl SlotId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_clamps() {
        let card = CardData::new(CardKind::Messi, -3, -7);
        assert_eq!(card.attack(), 0);
        assert_eq!(card.defense(), 0);

        let card = CardData::new(CardKind::Salah, 40, 12);
        assert_eq!(card.attack(), 40);
        assert_eq!(card.defense(), 12);
    }

    #[test]
    fn test_mutation_clamps() {
        let mut card = CardData::new(CardKind::Modric, 10, 10);
        card.set_attack(-1);
        card.set_defense(25);
        assert_eq!(card.attack(), 0);
        assert_eq!(card.defense(), 25);
    }

    #[test]
    fn test_display() {
        let card = CardData::new(CardKind::DeBruyne, 48, 22);
        assert_eq!(format!("{}", card), "DeBruyne (48 ATK / 22 DEF)");
        assert_eq!(format!("{}", SlotId::new(2)), "Slot(2)");
    }

    #[test]
    fn test_deserialize_clamps() {
        let json = r#"{"kind":"Kane","attack":45,"defense":-4}"#;
        let card: CardData = serde_json::from_str(json).unwrap();
        assert_eq!(card, CardData::new(CardKind::Kane, 45, 0));

        let back = serde_json::to_string(&card).unwrap();
        assert_eq!(back, r#"{"kind":"Kane","attack":45,"defense":0}"#);
    }
}

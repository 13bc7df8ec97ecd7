//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two participants: the human player and the
//! AI opponent. Most rules are symmetric, so they are written once against
//! a `Side` and its `other()`.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for health totals,
//! effect state and damage pairs.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two participants in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human side.
    Player,
    /// The AI side.
    Opponent,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    /// The side facing this one.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Opponent => write!(f, "AI"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use card_duel::core::{Side, SideMap};
///
/// let mut health = SideMap::with_value(200);
/// health[Side::Opponent] -= 60;
///
/// assert_eq!(health[Side::Player], 200);
/// assert_eq!(health[Side::Opponent], 140);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map from explicit player and opponent values.
    pub fn new(player: T, opponent: T) -> Self {
        Self {
            data: [player, opponent],
        }
    }

    /// Create a map with values from a factory function.
    pub fn from_fn(mut factory: impl FnMut(Side) -> T) -> Self {
        let player = factory(Side::Player);
        let opponent = factory(Side::Opponent);
        Self::new(player, opponent)
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs, player first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::BOTH.into_iter().zip(self.data.iter_mut())
    }

    /// Transform every entry, keeping the side association.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> SideMap<U> {
        let [player, opponent] = self.data;
        SideMap::new(f(Side::Player, player), f(Side::Opponent, opponent))
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_side() {
        assert_eq!(Side::Player.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Player);
        assert_eq!(Side::Player.other().other(), Side::Player);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Player), "Player");
        assert_eq!(format!("{}", Side::Opponent), "AI");
    }

    #[test]
    fn test_side_map_indexing() {
        let mut map = SideMap::new(1, 2);
        assert_eq!(map[Side::Player], 1);
        assert_eq!(map[Side::Opponent], 2);

        map[Side::Player] = 10;
        assert_eq!(map[Side::Player], 10);
    }

    #[test]
    fn test_side_map_from_fn() {
        let map = SideMap::from_fn(|side| side == Side::Opponent);
        assert!(!map[Side::Player]);
        assert!(map[Side::Opponent]);
    }

    #[test]
    fn test_side_map_iter_order() {
        let map = SideMap::new("p", "o");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::Player, &"p"), (Side::Opponent, &"o")]);
    }

    #[test]
    fn test_side_map_map() {
        let map = SideMap::new(3, 4).map(|side, v| if side == Side::Player { v * 10 } else { v });
        assert_eq!(map, SideMap::new(30, 4));
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(200, 140);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}

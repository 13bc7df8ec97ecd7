//! Cards: identities, combat stats, drop-target slots and the catalog.
//!
//! - `CardData`: Card kind plus non-negative attack/defense
//! - `SlotId`: Drop target a player card is committed through
//! - `CardCatalog`: Collection cards are drawn from

mod data;
mod catalog;

pub use data::{CardData, CardKind, SlotId};
pub use catalog::CardCatalog;

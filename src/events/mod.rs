//! Event system decoupling the battle core from presentation.
//!
//! ## Key Components
//!
//! - [`BattleEvent`]: Immutable notification values
//! - [`EventKind`]: Subscription key, one per event variant
//! - [`EventBus`]: Synchronous publish/subscribe hub with snapshot delivery
//!   and per-handler error isolation
//!
//! ## Example Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use card_duel::events::{BattleEvent, EventBus, EventKind};
//!
//! let bus = EventBus::new();
//! let shown = Rc::new(RefCell::new(None));
//!
//! let sink = Rc::clone(&shown);
//! bus.subscribe(EventKind::HealthChanged, move |event| {
//!     if let BattleEvent::HealthChanged { player_health, opponent_health } = event {
//!         *sink.borrow_mut() = Some((*player_health, *opponent_health));
//!     }
//!     Ok(())
//! });
//!
//! bus.publish(BattleEvent::health(200, 140));
//! assert_eq!(*shown.borrow(), Some((200, 140)));
//! ```

mod event;
mod bus;

pub use event::{BattleEvent, EventKind};
pub use bus::{Delivery, EventBus, Handler, SubscriptionId};

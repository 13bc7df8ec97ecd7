//! Publish/subscribe event bus.
//!
//! The bus is an explicit instance owned by the composition root and
//! shared by `Rc`; there is no process-wide listener table. All methods
//! take `&self` so handlers may subscribe, unsubscribe or publish while a
//! delivery is in flight.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::BattleError;

use super::event::{BattleEvent, EventKind};

/// A subscriber callback.
///
/// Returning an error never stops delivery to the other subscribers.
pub type Handler = Rc<dyn Fn(&BattleEvent) -> Result<(), BattleError>>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Outcome of one `publish` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned an error.
    pub failed: usize,
}

impl Delivery {
    /// Total handlers invoked.
    #[must_use]
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Typed publish/subscribe hub.
///
/// ## Delivery rules
///
/// - Handlers are keyed by `EventKind`; several per kind are allowed.
/// - `publish` invokes a snapshot of the handler list taken when the call
///   starts, so subscription changes made during dispatch only affect
///   later publishes.
/// - A failing handler is logged and skipped; the rest still run.
/// - Nothing is retained after delivery. Late subscribers never see
///   earlier events.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use card_duel::events::{BattleEvent, EventBus, EventKind};
///
/// let bus = EventBus::new();
/// let seen = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&seen);
/// let id = bus.subscribe(EventKind::EndTurnRequested, move |_| {
///     counter.set(counter.get() + 1);
///     Ok(())
/// });
///
/// bus.publish(BattleEvent::EndTurnRequested);
/// assert!(bus.unsubscribe(EventKind::EndTurnRequested, id));
/// bus.publish(BattleEvent::EndTurnRequested);
///
/// assert_eq!(seen.get(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<FxHashMap<EventKind, Vec<(SubscriptionId, Handler)>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&BattleEvent) -> Result<(), BattleError> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not subscribed to `kind`.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };

        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        let removed = list.len() != before;

        if list.is_empty() {
            handlers.remove(&kind);
        }
        removed
    }

    /// Deliver an event to every current subscriber of its kind.
    pub fn publish(&self, event: BattleEvent) -> Delivery {
        let kind = event.kind();

        // Snapshot, then release the borrow before any handler runs.
        let snapshot: SmallVec<[Handler; 4]> = match self.handlers.borrow().get(&kind) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return Delivery::default(),
        };

        let mut delivery = Delivery::default();
        for handler in snapshot {
            tracing::trace!(%kind, "delivering event");
            match handler(&event) {
                Ok(()) => delivery.delivered += 1,
                Err(error) => {
                    tracing::error!(%kind, %error, "event handler failed");
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }

    /// Number of handlers subscribed to `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every subscription. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut handlers = self.handlers.borrow_mut();
        let total: usize = handlers.values().map(Vec::len).sum();
        handlers.clear();
        tracing::debug!(total, "cleared event subscriptions");
        total
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        let mut counts: Vec<_> = handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(k, _)| format!("{k}"));
        f.debug_struct("EventBus")
            .field("handlers", &counts)
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&BattleEvent) -> Result<(), BattleError> {
        let log = Rc::clone(log);
        move |_: &BattleEvent| {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        let delivery = bus.publish(BattleEvent::SkillDisplayCleared);
        assert_eq!(delivery, Delivery::default());
    }

    #[test]
    fn test_multiple_handlers_all_invoked() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(EventKind::UseSkillRequested, recorder(&log, "a"));
        bus.subscribe(EventKind::UseSkillRequested, recorder(&log, "b"));
        bus.subscribe(EventKind::EndTurnRequested, recorder(&log, "other"));

        let delivery = bus.publish(BattleEvent::UseSkillRequested);

        assert_eq!(delivery.delivered, 2);
        let mut seen = log.borrow().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_removes_empty_kind() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = bus.subscribe(EventKind::HealthChanged, recorder(&log, "h"));

        assert_eq!(bus.handler_count(EventKind::HealthChanged), 1);
        assert!(bus.unsubscribe(EventKind::HealthChanged, id));
        assert!(!bus.unsubscribe(EventKind::HealthChanged, id));
        assert_eq!(bus.handler_count(EventKind::HealthChanged), 0);
    }

    #[test]
    fn test_unsubscribe_wrong_kind() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = bus.subscribe(EventKind::HealthChanged, recorder(&log, "h"));
        assert!(!bus.unsubscribe(EventKind::GameFinished, id));
        assert_eq!(bus.handler_count(EventKind::HealthChanged), 1);
    }

    #[test]
    fn test_failing_handler_isolated() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(EventKind::EndTurnRequested, |_| {
            Err(BattleError::Handler("boom".into()))
        });
        bus.subscribe(EventKind::EndTurnRequested, recorder(&log, "after"));

        let delivery = bus.publish(BattleEvent::EndTurnRequested);

        assert_eq!(delivery.failed, 1);
        assert_eq!(delivery.delivered, 1);
        assert_eq!(*log.borrow(), vec!["after"]);
    }

    #[test]
    fn test_clear() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(EventKind::EndTurnRequested, recorder(&log, "a"));
        bus.subscribe(EventKind::HealthChanged, recorder(&log, "b"));
        bus.subscribe(EventKind::HealthChanged, recorder(&log, "c"));

        assert_eq!(bus.clear(), 3);
        assert_eq!(bus.clear(), 0);
        assert_eq!(bus.publish(BattleEvent::health(1, 1)).invoked(), 0);
    }

    #[test]
    fn test_subscription_ids_unique() {
        let bus = EventBus::new();
        let a = bus.subscribe(EventKind::EndTurnRequested, |_| Ok(()));
        let b = bus.subscribe(EventKind::EndTurnRequested, |_| Ok(()));
        assert_ne!(a, b);
        assert_eq!(b.raw(), a.raw() + 1);
    }
}

//! Composition root.
//!
//! A `BattleSession` owns the event bus and the turn controller and wires
//! the request events to controller operations. Presentation code only
//! talks to the bus: it publishes requests through [`BattleSession::request`]
//! and subscribes to the notifications.
//!
//! Request handlers hold a weak reference to the controller, so the bus
//! (which the controller also holds) never keeps it alive. A request
//! published while the controller is busy (for example a retry sent from a
//! `GameFinished` handler) is queued and runs as soon as the busy
//! operation releases the controller, in publish order.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::battle::BattleOutcome;
use crate::cards::CardCatalog;
use crate::core::{BattleConfig, BattleError, GameRng};
use crate::events::{BattleEvent, Delivery, EventBus, EventKind, SubscriptionId};
use crate::skills::{SkillEngine, SkillService};
use crate::turn::{OpponentProvider, RandomOpponent, TurnController};

/// Requests the session routes to the controller.
const REQUESTS: [EventKind; 5] = [
    EventKind::UseSkillRequested,
    EventKind::EndTurnRequested,
    EventKind::RetryGameRequested,
    EventKind::CardPlacedOnTarget,
    EventKind::CardRemovedFromTarget,
];

type Deferred = Rc<RefCell<VecDeque<BattleEvent>>>;

/// A wired-up battle: bus, controller and request routing.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use card_duel::cards::{CardData, CardKind, SlotId};
/// use card_duel::core::BattleConfig;
/// use card_duel::events::{BattleEvent, EventKind};
/// use card_duel::session::BattleSession;
///
/// let config = BattleConfig::default();
/// let session = BattleSession::standard(&config).unwrap();
///
/// let resolved = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&resolved);
/// session.bus().subscribe(EventKind::TurnResolved, move |_| {
///     counter.set(counter.get() + 1);
///     Ok(())
/// });
///
/// session.start().unwrap();
/// session.request(BattleEvent::CardPlacedOnTarget {
///     slot: SlotId::new(0),
///     card: CardData::new(CardKind::Messi, 50, 20),
/// });
/// session.request(BattleEvent::EndTurnRequested);
/// session.advance(config.settle_delay()).unwrap();
///
/// assert_eq!(resolved.get(), 1);
/// assert_eq!(session.controller().battle().turn(), 1);
/// ```
pub struct BattleSession<S: SkillService + 'static = SkillEngine> {
    bus: Rc<EventBus>,
    controller: Rc<RefCell<TurnController<S>>>,
    deferred: Deferred,
    subscriptions: Vec<(EventKind, SubscriptionId)>,
}

impl BattleSession {
    /// Session with the standard skill catalog and a random opponent
    /// drawing from the standard card catalog.
    ///
    /// Skills and opponent draws use separate streams derived from
    /// `config.seed`, so one never shifts the other.
    pub fn standard(config: &BattleConfig) -> Result<Self, BattleError> {
        config.validate()?;

        let rng = GameRng::new(config.seed);
        let skills = SkillEngine::new(rng.for_context("skills"));
        let opponent = RandomOpponent::new(CardCatalog::standard(), rng.for_context("opponent"));
        Ok(Self::new(config, skills, Box::new(opponent)))
    }
}

impl<S: SkillService + 'static> BattleSession<S> {
    /// Session on a fresh bus.
    pub fn new(config: &BattleConfig, skills: S, opponent: Box<dyn OpponentProvider>) -> Self {
        Self::with_bus(Rc::new(EventBus::new()), config, skills, opponent)
    }

    /// Session on an existing bus, for hosts that already publish on one.
    pub fn with_bus(
        bus: Rc<EventBus>,
        config: &BattleConfig,
        skills: S,
        opponent: Box<dyn OpponentProvider>,
    ) -> Self {
        let controller = Rc::new(RefCell::new(TurnController::new(
            config,
            Rc::clone(&bus),
            skills,
            opponent,
        )));

        let mut session = Self {
            bus,
            controller,
            deferred: Rc::default(),
            subscriptions: Vec::with_capacity(REQUESTS.len()),
        };
        for kind in REQUESTS {
            session.route(kind);
        }
        session
    }

    fn route(&mut self, kind: EventKind) {
        let controller = Rc::downgrade(&self.controller);
        let deferred = Rc::clone(&self.deferred);

        let id = self.bus.subscribe(kind, move |event| {
            let Some(controller) = controller.upgrade() else {
                return Ok(());
            };
            let result = match controller.try_borrow_mut() {
                Ok(mut controller) => dispatch(&mut controller, event),
                Err(_) => {
                    tracing::debug!(%kind, "controller busy, deferring request");
                    deferred.borrow_mut().push_back(event.clone());
                    return Ok(());
                }
            };
            drain(&controller, &deferred);
            result
        });
        self.subscriptions.push((kind, id));
    }

    // === Driving ===

    /// Start the battle and publish the initial state.
    ///
    /// Fails with `Reentrant` when called while the controller is busy,
    /// i.e. from inside a notification handler.
    pub fn start(&self) -> Result<(), BattleError> {
        self.controller
            .try_borrow_mut()
            .map_err(|_| BattleError::Reentrant("start"))?
            .start_battle();
        drain(&self.controller, &self.deferred);
        Ok(())
    }

    /// Publish a request (or any event) on the session's bus.
    pub fn request(&self, event: BattleEvent) -> Delivery {
        if !event.kind().is_request() {
            tracing::debug!(kind = %event.kind(), "publishing non-request event through session");
        }
        self.bus.publish(event)
    }

    /// Advance the logical clock, running any due settle continuation and
    /// then any request deferred while it ran.
    ///
    /// Returns the outcome if the settle finished the battle. Fails with
    /// `Reentrant` when called while the controller is busy.
    pub fn advance(&self, elapsed: Duration) -> Result<Option<BattleOutcome>, BattleError> {
        let outcome = self
            .controller
            .try_borrow_mut()
            .map_err(|_| BattleError::Reentrant("advance"))?
            .advance(elapsed);
        drain(&self.controller, &self.deferred);
        Ok(outcome)
    }

    // === Access ===

    #[must_use]
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Read access to the controller.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a handler while a request is running.
    #[must_use]
    pub fn controller(&self) -> Ref<'_, TurnController<S>> {
        self.controller.borrow()
    }

    /// Requests waiting for the controller to become free.
    #[must_use]
    pub fn deferred(&self) -> usize {
        self.deferred.borrow().len()
    }

    /// Detach the request handlers from the bus. Returns how many were
    /// removed; later calls return 0.
    pub fn close(&mut self) -> usize {
        let removed = self
            .subscriptions
            .drain(..)
            .filter(|(kind, id)| self.bus.unsubscribe(*kind, *id))
            .count();
        self.deferred.borrow_mut().clear();
        if removed > 0 {
            tracing::debug!(removed, "battle session closed");
        }
        removed
    }
}

impl<S: SkillService + 'static> Drop for BattleSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: SkillService + 'static> std::fmt::Debug for BattleSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleSession")
            .field("bus", &self.bus)
            .field("deferred", &self.deferred())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

/// Run one request against the controller.
fn dispatch<S: SkillService>(
    controller: &mut TurnController<S>,
    event: &BattleEvent,
) -> Result<(), BattleError> {
    let result = match event {
        BattleEvent::UseSkillRequested => controller.use_skill().map(drop),
        BattleEvent::EndTurnRequested => controller.end_turn().map(drop),
        BattleEvent::RetryGameRequested => {
            controller.retry();
            Ok(())
        }
        BattleEvent::CardPlacedOnTarget { slot, card } => controller.place_card(*slot, *card),
        BattleEvent::CardRemovedFromTarget { slot, .. } => controller.remove_card(*slot),
        _ => Ok(()),
    };
    absorb(event.kind(), result)
}

/// Run queued requests while the controller is free.
///
/// Requests published by a deferred request's own notifications are
/// queued behind it and picked up by the same loop.
fn drain<S: SkillService>(
    controller: &RefCell<TurnController<S>>,
    deferred: &RefCell<VecDeque<BattleEvent>>,
) {
    loop {
        let Ok(mut controller) = controller.try_borrow_mut() else {
            return;
        };
        let Some(event) = deferred.borrow_mut().pop_front() else {
            return;
        };
        let kind = event.kind();
        tracing::debug!(%kind, "running deferred request");
        if let Err(error) = dispatch(&mut controller, &event) {
            tracing::error!(%kind, %error, "deferred request failed");
        }
    }
}

/// Turn expected request failures into logged no-ops.
///
/// Requests that make no sense in the current state are ignored, and a
/// missing card or empty catalog skips the turn. Anything else is a real
/// failure and goes back to the bus, which logs it.
fn absorb(request: EventKind, result: Result<(), BattleError>) -> Result<(), BattleError> {
    match result {
        Ok(()) => Ok(()),
        Err(error) if error.is_invalid_state() => {
            tracing::debug!(%request, %error, "request rejected");
            Ok(())
        }
        Err(error @ (BattleError::MissingCard(_) | BattleError::EmptyCatalog)) => {
            tracing::warn!(%request, %error, "turn skipped");
            Ok(())
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::cards::{CardData, CardKind, SlotId};

    fn session() -> BattleSession {
        let session = BattleSession::standard(&BattleConfig::default()).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn test_standard_rejects_invalid_config() {
        let config = BattleConfig::default().with_max_turns(0);
        let err = BattleSession::standard(&config).unwrap_err();
        assert!(matches!(err, BattleError::Config(_)));
    }

    #[test]
    fn test_requests_are_routed() {
        let session = session();
        for kind in REQUESTS {
            assert_eq!(session.bus().handler_count(kind), 1, "{kind}");
        }
    }

    #[test]
    fn test_missing_card_is_absorbed() {
        let session = session();
        let delivery = session.request(BattleEvent::EndTurnRequested);
        assert_eq!(delivery.delivered, 1);
        assert_eq!(session.controller().battle().turn(), 0);
    }

    #[test]
    fn test_place_and_end_turn() {
        let session = session();
        session.request(BattleEvent::CardPlacedOnTarget {
            slot: SlotId::new(2),
            card: CardData::new(CardKind::Mbappe, 54, 16),
        });
        session.request(BattleEvent::EndTurnRequested);

        assert_eq!(session.controller().battle().turn(), 1);
        assert!(session.controller().is_resolving());
    }

    #[test]
    fn test_nested_request_is_deferred_not_dropped() {
        let session = session();
        let bus = Rc::clone(session.bus());
        let shown = Rc::new(Cell::new(0));
        let nested = Rc::new(RefCell::new(None));

        let (count, sink) = (Rc::clone(&shown), Rc::clone(&nested));
        session.bus().subscribe(EventKind::SkillsDisplayed, move |_| {
            count.set(count.get() + 1);
            if sink.borrow().is_none() {
                let delivery = bus.publish(BattleEvent::UseSkillRequested);
                *sink.borrow_mut() = Some(delivery);
            }
            Ok(())
        });

        session.request(BattleEvent::UseSkillRequested);

        let nested = nested.borrow().expect("nested publish ran");
        assert_eq!(nested.failed, 0);
        assert_eq!(shown.get(), 2);
        assert_eq!(session.deferred(), 0);
    }

    #[test]
    fn test_start_from_handler_is_reentrant() {
        let session = Rc::new(session());
        let result = Rc::new(RefCell::new(None));

        let (inner, sink) = (Rc::downgrade(&session), Rc::clone(&result));
        session.bus().subscribe(EventKind::SkillsDisplayed, move |_| {
            if let Some(session) = inner.upgrade() {
                *sink.borrow_mut() = Some(session.start());
            }
            Ok(())
        });
        session.request(BattleEvent::UseSkillRequested);

        assert_eq!(*result.borrow(), Some(Err(BattleError::Reentrant("start"))));
    }

    #[test]
    fn test_close_detaches_handlers() {
        let mut session = session();
        assert_eq!(session.close(), 5);
        assert_eq!(session.close(), 0);
        assert_eq!(session.request(BattleEvent::EndTurnRequested).invoked(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = Rc::new(EventBus::new());
        {
            let _session = BattleSession::with_bus(
                Rc::clone(&bus),
                &BattleConfig::default(),
                SkillEngine::new(GameRng::new(3)),
                Box::new(|| None::<CardData>),
            );
            assert_eq!(bus.handler_count(EventKind::EndTurnRequested), 1);
        }
        assert_eq!(bus.handler_count(EventKind::EndTurnRequested), 0);
    }
}

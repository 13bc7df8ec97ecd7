//! Event bus integration tests.
//!
//! These tests cover delivery order independence, snapshot semantics when
//! handlers change subscriptions mid-dispatch, and error isolation.

use std::cell::RefCell;
use std::rc::Rc;

use card_duel::core::BattleError;
use card_duel::events::{BattleEvent, EventBus, EventKind, SubscriptionId};

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Test that handlers only see events of the kind they subscribed to.
#[test]
fn test_delivery_is_keyed_by_kind() {
    let bus = EventBus::new();
    let seen = log();

    let sink = Rc::clone(&seen);
    bus.subscribe(EventKind::HealthChanged, move |event| {
        sink.borrow_mut().push(format!("{}", event.kind()));
        Ok(())
    });

    bus.publish(BattleEvent::SkillDisplayCleared);
    bus.publish(BattleEvent::health(200, 180));
    bus.publish(BattleEvent::buttons(true));

    assert_eq!(*seen.borrow(), vec!["HealthChanged".to_string()]);
}

/// Test that a handler subscribed during dispatch does not receive the
/// event being dispatched, but does receive later ones.
#[test]
fn test_subscribe_during_dispatch_applies_to_next_publish() {
    let bus = Rc::new(EventBus::new());
    let seen = log();

    let inner_bus = Rc::clone(&bus);
    let inner_log = Rc::clone(&seen);
    bus.subscribe(EventKind::EndTurnRequested, move |_| {
        let sink = Rc::clone(&inner_log);
        inner_bus.subscribe(EventKind::EndTurnRequested, move |_| {
            sink.borrow_mut().push("late".to_string());
            Ok(())
        });
        Ok(())
    });

    let first = bus.publish(BattleEvent::EndTurnRequested);
    assert_eq!(first.invoked(), 1);
    assert!(seen.borrow().is_empty());

    let second = bus.publish(BattleEvent::EndTurnRequested);
    assert_eq!(second.invoked(), 2);
    assert_eq!(*seen.borrow(), vec!["late".to_string()]);
}

/// Test that a handler removed during dispatch still runs for the event
/// already in flight.
#[test]
fn test_unsubscribe_during_dispatch_uses_snapshot() {
    let bus = Rc::new(EventBus::new());
    let seen = log();
    let victim: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));

    let remover_bus = Rc::clone(&bus);
    let target = Rc::clone(&victim);
    bus.subscribe(EventKind::UseSkillRequested, move |_| {
        if let Some(id) = target.borrow_mut().take() {
            remover_bus.unsubscribe(EventKind::UseSkillRequested, id);
        }
        Ok(())
    });

    let sink = Rc::clone(&seen);
    let id = bus.subscribe(EventKind::UseSkillRequested, move |_| {
        sink.borrow_mut().push("victim".to_string());
        Ok(())
    });
    *victim.borrow_mut() = Some(id);

    bus.publish(BattleEvent::UseSkillRequested);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(bus.handler_count(EventKind::UseSkillRequested), 1);

    bus.publish(BattleEvent::UseSkillRequested);
    assert_eq!(seen.borrow().len(), 1);
}

/// Test that publishing from inside a handler delivers synchronously.
#[test]
fn test_nested_publish() {
    let bus = Rc::new(EventBus::new());
    let seen = log();

    let relay = Rc::clone(&bus);
    bus.subscribe(EventKind::RetryGameRequested, move |_| {
        relay.publish(BattleEvent::ResetDeckRequested);
        Ok(())
    });
    let sink = Rc::clone(&seen);
    bus.subscribe(EventKind::ResetDeckRequested, move |_| {
        sink.borrow_mut().push("reset".to_string());
        Ok(())
    });

    bus.publish(BattleEvent::RetryGameRequested);
    assert_eq!(*seen.borrow(), vec!["reset".to_string()]);
}

/// Test that every failing handler is counted and the rest still run.
#[test]
fn test_failures_do_not_stop_delivery() {
    let bus = EventBus::new();
    let seen = log();

    for tag in ["a", "b", "c"] {
        bus.subscribe(EventKind::GameFinished, |_| {
            Err(BattleError::Handler("display unavailable".into()))
        });
        let sink = Rc::clone(&seen);
        bus.subscribe(EventKind::GameFinished, move |event| {
            if let BattleEvent::GameFinished { message } = event {
                sink.borrow_mut().push(format!("{tag}:{message}"));
            }
            Ok(())
        });
    }

    let delivery = bus.publish(BattleEvent::GameFinished {
        message: "DRAW!".into(),
    });

    assert_eq!(delivery.failed, 3);
    assert_eq!(delivery.delivered, 3);
    assert_eq!(seen.borrow().len(), 3);
}

/// Test that nothing is replayed to late subscribers.
#[test]
fn test_no_replay_for_late_subscribers() {
    let bus = EventBus::new();
    bus.publish(BattleEvent::health(200, 200));

    let seen = log();
    let sink = Rc::clone(&seen);
    bus.subscribe(EventKind::HealthChanged, move |_| {
        sink.borrow_mut().push("health".to_string());
        Ok(())
    });

    assert!(seen.borrow().is_empty());
}

/// Test that events serialize with their payload.
#[test]
fn test_event_serialization() {
    let event = BattleEvent::TurnResolved {
        turn: 3,
        player_damage: 60,
        opponent_damage: 15,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: BattleEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
    assert!(json.contains("TurnResolved"));
}

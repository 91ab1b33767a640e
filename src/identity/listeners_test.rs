use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<Option<String>>>>, SessionCallback) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let callback: SessionCallback = Box::new(move |session: Option<Session>| {
        sink.borrow_mut().push(session.map(|s| s.user.id));
    });
    (seen, callback)
}

#[test]
fn notify_reaches_every_listener() {
    let registry = ListenerRegistry::new();
    let (a, cb_a) = recorder();
    let (b, cb_b) = recorder();
    let _sub_a = registry.register(cb_a);
    let _sub_b = registry.register(cb_b);

    registry.notify(Some(&Session::for_user("u1")));
    registry.notify(None);

    assert_eq!(*a.borrow(), vec![Some("u1".to_owned()), None]);
    assert_eq!(*b.borrow(), vec![Some("u1".to_owned()), None]);
}

#[test]
fn dropped_subscription_stops_delivery() {
    let registry = ListenerRegistry::new();
    let (seen, callback) = recorder();
    let sub = registry.register(callback);
    assert_eq!(registry.len(), 1);

    drop(sub);
    assert!(registry.is_empty());

    registry.notify(Some(&Session::for_user("u1")));
    assert!(seen.borrow().is_empty());
}

#[test]
fn cancel_is_equivalent_to_drop() {
    let registry = ListenerRegistry::new();
    let (seen, callback) = recorder();
    registry.register(callback).cancel();
    registry.notify(None);
    assert!(seen.borrow().is_empty());
}

#[test]
fn listener_cancelled_mid_round_is_skipped() {
    let registry = ListenerRegistry::new();
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&victim);
    let _killer = registry.register(Box::new(move |_: Option<Session>| {
        slot.borrow_mut().take();
    }));
    let (seen, callback) = recorder();
    *victim.borrow_mut() = Some(registry.register(callback));

    registry.notify(Some(&Session::for_user("u1")));
    assert!(seen.borrow().is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn subscription_outliving_registry_is_harmless() {
    let registry = ListenerRegistry::new();
    let (_seen, callback) = recorder();
    let sub = registry.register(callback);
    drop(registry);
    drop(sub);
}

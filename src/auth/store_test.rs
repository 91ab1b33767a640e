use super::*;
use crate::error::AUTH_SERVICE_UNREACHABLE;
use crate::identity::Session;
use crate::test_helpers::{self, FakeProvider};

// =============================================================================
// Initialization
// =============================================================================

#[tokio::test]
async fn starts_initializing_until_lookup_resolves() {
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider);

    assert_eq!(store.state(), AuthState { session: None, initializing: true, last_error: None });

    release.send(Ok(Some(Session::for_user("u1")))).unwrap();
    lookup.await;

    assert_eq!(
        store.state(),
        AuthState { session: Some(Session::for_user("u1")), initializing: false, last_error: None }
    );
}

#[tokio::test]
async fn lookup_without_session_resolves_signed_out() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, lookup) = SessionStore::start(provider);
    lookup.await;

    let state = store.state();
    assert!(!state.initializing);
    assert!(state.session.is_none());
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn lookup_failure_defaults_to_signed_out_with_advisory() {
    test_helpers::init_tracing();
    let provider = FakeProvider::resolved(Err(ProviderError::Transport("offline".into())));
    let (store, lookup) = SessionStore::start(provider);
    lookup.await;

    let state = store.state();
    assert!(!state.initializing);
    assert!(state.session.is_none());
    assert_eq!(state.last_error.as_deref(), Some(AUTH_SERVICE_UNREACHABLE));
}

#[tokio::test]
async fn reader_ready_waits_for_first_resolution() {
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider);
    let mut reader = store.reader();

    let waiter = async { reader.ready().await };
    let driver = async move {
        release.send(Ok(Some(Session::for_user("u1")))).unwrap();
        lookup.await;
    };
    let (ready, ()) = tokio::join!(waiter, driver);

    let ready = ready.unwrap();
    assert!(!ready.initializing);
    assert_eq!(ready.session, Some(Session::for_user("u1")));
}

// =============================================================================
// Subscription
// =============================================================================

#[tokio::test]
async fn last_notification_wins() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, lookup) = SessionStore::start(provider.clone());
    lookup.await;

    let sequence = [
        Some(Session::for_user("a")),
        None,
        Some(Session::for_user("b")),
        Some(Session::for_user("c")),
        None,
        Some(Session::for_user("d")),
    ];
    for (i, notified) in sequence.iter().enumerate() {
        provider.emit(notified.clone());
        assert_eq!(&store.state().session, notified, "after notification {i}");
    }
}

#[tokio::test]
async fn notification_clears_last_error() {
    let provider = FakeProvider::resolved(Err(ProviderError::Transport("offline".into())));
    let (store, lookup) = SessionStore::start(provider.clone());
    lookup.await;
    assert!(store.state().last_error.is_some());

    provider.emit(Some(Session::for_user("u1")));
    let state = store.state();
    assert!(state.last_error.is_none());
    assert_eq!(state.session, Some(Session::for_user("u1")));
}

#[tokio::test]
async fn notification_does_not_end_initialization() {
    let (provider, _release) = FakeProvider::pending();
    let (store, _lookup) = SessionStore::start(provider.clone());

    provider.emit(Some(Session::for_user("u1")));
    let state = store.state();
    assert!(state.initializing);
    assert_eq!(state.session, Some(Session::for_user("u1")));
}

#[tokio::test]
async fn notification_before_lookup_is_not_overwritten() {
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider.clone());

    provider.emit(None);
    release.send(Ok(Some(Session::for_user("stale")))).unwrap();
    lookup.await;

    let state = store.state();
    assert!(!state.initializing);
    assert!(state.session.is_none());
}

#[tokio::test]
async fn failed_lookup_after_notification_keeps_session_without_advisory() {
    test_helpers::init_tracing();
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider.clone());

    provider.emit(Some(Session::for_user("u1")));
    release.send(Err(ProviderError::Transport("offline".into()))).unwrap();
    lookup.await;

    assert_eq!(
        store.state(),
        AuthState { session: Some(Session::for_user("u1")), initializing: false, last_error: None }
    );
}

#[tokio::test]
async fn reader_observes_each_change() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, lookup) = SessionStore::start(provider.clone());
    let mut reader = store.reader();
    lookup.await;

    let first = reader.changed().await.unwrap();
    assert!(!first.initializing);

    provider.emit(Some(Session::for_user("u1")));
    let second = reader.changed().await.unwrap();
    assert_eq!(second.session, Some(Session::for_user("u1")));
}

#[tokio::test]
async fn reader_ends_when_store_is_dropped() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, _lookup) = SessionStore::start(provider);
    let mut reader = store.reader();
    drop(store);
    assert!(reader.changed().await.is_none());
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn teardown_cancels_subscription() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, lookup) = SessionStore::start(provider.clone());
    lookup.await;
    assert_eq!(provider.listener_count(), 1);

    store.teardown();
    assert!(!store.is_alive());
    assert_eq!(provider.listener_count(), 0);

    provider.emit(Some(Session::for_user("ghost")));
    assert!(store.state().session.is_none());
}

#[tokio::test]
async fn teardown_is_idempotent() {
    let provider = FakeProvider::resolved(Ok(None));
    let (store, _lookup) = SessionStore::start(provider);
    store.teardown();
    store.teardown();
    assert!(!store.is_alive());
}

#[tokio::test]
async fn late_lookup_after_teardown_is_discarded() {
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider);
    let reader = store.reader();

    store.teardown();
    release.send(Ok(Some(Session::for_user("late")))).unwrap();
    lookup.await;

    let state = reader.current();
    assert!(state.initializing);
    assert!(state.session.is_none());
}

#[tokio::test]
async fn late_lookup_after_drop_is_discarded() {
    let (provider, release) = FakeProvider::pending();
    let (store, lookup) = SessionStore::start(provider.clone());
    let reader = store.reader();

    drop(store);
    assert_eq!(provider.listener_count(), 0);
    release.send(Err(ProviderError::Transport("late".into()))).unwrap();
    lookup.await;

    let state = reader.current();
    assert!(state.initializing);
    assert!(state.last_error.is_none());
}

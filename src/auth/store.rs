//! Session store: the single authoritative [`AuthState`] for one app run.
//!
//! LIFECYCLE
//! =========
//! 1. [`SessionStore::start`] publishes `initializing = true`, registers the
//!    provider subscription, and hands back the one-shot lookup future for
//!    the caller to drive on its event loop.
//! 2. The lookup resolves exactly once and flips `initializing` to false,
//!    whether it succeeded or failed. Failures default to signed-out with an
//!    advisory `last_error`, unless a notification already settled the
//!    session; there is no automatic retry.
//! 3. Every subscription notification replaces `session` and clears
//!    `last_error`.
//! 4. [`SessionStore::teardown`] (or drop) marks the store dead and cancels
//!    the subscription. Late lookup results and stray notifications are then
//!    discarded.
//!
//! If a notification lands before the lookup resolves, the notified session
//! wins: it is newer than whatever the lookup observed.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::AuthState;
use crate::error::{AUTH_SERVICE_UNREACHABLE, ProviderError};
use crate::identity::{IdentityProvider, Session, Subscription};

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

struct StoreInner {
    state: watch::Sender<AuthState>,
    alive: Cell<bool>,
    notified: Cell<bool>,
    subscription: RefCell<Option<Subscription>>,
}

impl StoreInner {
    fn apply_notification(&self, session: Option<Session>) {
        if !self.alive.get() {
            debug!("discarding session notification after teardown");
            return;
        }
        self.notified.set(true);
        let changed = self.state.send_if_modified(|state| {
            let changed = state.session != session || state.last_error.is_some();
            state.session = session;
            state.last_error = None;
            changed
        });
        debug!(changed, user_id = ?self.state.borrow().user().map(|u| u.id.clone()), "session notification applied");
    }

    fn apply_initial(&self, outcome: Result<Option<Session>, ProviderError>) {
        if !self.alive.get() {
            debug!("discarding initial session lookup after teardown");
            return;
        }
        let superseded = self.notified.get();
        self.state.send_modify(|state| {
            match outcome {
                Ok(session) => {
                    if !superseded {
                        state.session = session;
                    }
                    state.last_error = None;
                }
                Err(e) => {
                    warn!(error = %e, "initial session lookup failed");
                    if !superseded {
                        state.session = None;
                        state.last_error = Some(AUTH_SERVICE_UNREACHABLE.to_owned());
                    }
                }
            }
            state.initializing = false;
        });
        info!(
            authenticated = self.state.borrow().session.is_some(),
            superseded,
            "auth initialized"
        );
    }
}

/// Owner of the process-wide auth state.
///
/// Not `Clone`: exactly one instance per app run. Readers get an
/// [`AuthReader`] from [`SessionStore::reader`].
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

impl SessionStore {
    /// Create the store, subscribe to `provider`, and return the initial
    /// lookup future. The store stays `initializing` until that future has
    /// been driven to completion.
    pub fn start<P>(provider: Rc<P>) -> (Self, impl Future<Output = ()> + 'static)
    where
        P: IdentityProvider + ?Sized + 'static,
    {
        let (state, _) = watch::channel(AuthState::default());
        let inner = Rc::new(StoreInner {
            state,
            alive: Cell::new(true),
            notified: Cell::new(false),
            subscription: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let subscription = provider.subscribe(Box::new(move |session| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_notification(session);
            }
        }));
        *inner.subscription.borrow_mut() = Some(subscription);

        let lookup = initial_lookup(provider, Rc::downgrade(&inner));
        (Self { inner }, lookup)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Read-only accessor handed to the rest of the app.
    #[must_use]
    pub fn reader(&self) -> AuthReader {
        AuthReader { rx: self.inner.state.subscribe() }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    /// Stop accepting updates and cancel the provider subscription.
    /// Idempotent.
    pub fn teardown(&self) {
        if !self.inner.alive.replace(false) {
            return;
        }
        let subscription = self.inner.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        debug!("session store torn down");
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn initial_lookup<P>(provider: Rc<P>, store: Weak<StoreInner>)
where
    P: IdentityProvider + ?Sized,
{
    let outcome = provider.get_current_session().await;
    match store.upgrade() {
        Some(inner) => inner.apply_initial(outcome),
        None => debug!("session store dropped before initial lookup resolved"),
    }
}

// =============================================================================
// READER
// =============================================================================

/// Read-only, change-notifying view of the auth state.
#[derive(Clone)]
pub struct AuthReader {
    rx: watch::Receiver<AuthState>,
}

impl AuthReader {
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the initial lookup has resolved. `None` if the store is
    /// dropped first.
    pub async fn ready(&mut self) -> Option<AuthState> {
        let state = self.rx.wait_for(|state| !state.initializing).await.ok()?;
        Some(state.clone())
    }
}

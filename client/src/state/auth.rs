//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component builds the single `SessionStore` once per app run and
//! mirrors its state into an `RwSignal<AuthState>` that route guards and
//! user-aware components read. The store is torn down with the root owner,
//! which cancels the provider subscription.

use std::rc::Rc;

use leptos::prelude::*;
use mayfly::auth::{AuthFacade, AuthState, SessionStore};
use mayfly::identity::IdentityProvider;

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

/// Handle shared through context: the mirrored state plus the facade.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    facade: StoredValue<AuthFacade, LocalStorage>,
}

impl AuthContext {
    #[must_use]
    pub fn facade(&self) -> AuthFacade {
        self.facade.get_value()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.state.with(|s| s.user().map(|u| u.id.clone()))
    }
}

/// Start the session store, bridge it into a signal and provide the context.
pub fn provide_auth(provider: Rc<dyn IdentityProvider>) -> AuthContext {
    let (store, lookup) = SessionStore::start(provider.clone());
    let state = RwSignal::new(store.state());
    let reader = store.reader();
    let store = StoredValue::new_local(store);

    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(lookup);
        let mut reader = reader;
        leptos::task::spawn_local(async move {
            while let Some(next) = reader.changed().await {
                if state.try_set(next).is_some() {
                    break;
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        // The server never resolves auth: gated views stay deferred until
        // the browser takes over.
        let _ = (lookup, reader);
    }

    on_cleanup(move || store.with_value(SessionStore::teardown));

    let ctx = AuthContext { state, facade: StoredValue::new_local(AuthFacade::new(provider)) };
    provide_context(ctx);
    ctx
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Advisory shown when the initial session lookup failed.
#[must_use]
pub fn advisory(state: &AuthState) -> Option<String> {
    if state.initializing { None } else { state.last_error.clone() }
}

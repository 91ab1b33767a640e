//! Client-side authentication lifecycle.
//!
//! ARCHITECTURE
//! ============
//! - [`store::SessionStore`] owns the single [`AuthState`] and is its only
//!   writer (initial lookup + provider subscription).
//! - [`facade::AuthFacade`] runs sign-in / sign-up / sign-out against the
//!   provider and never touches the store; results come back through the
//!   subscription.
//! - [`gate::AccessGate`] turns the current state into a render decision for
//!   protected views.

pub mod facade;
pub mod gate;
pub mod store;

use crate::identity::{Identity, Session};

pub use facade::{AuthFacade, SignUpOutcome};
pub use gate::{AccessGate, GateDecision, Gated, LOGIN_ROUTE, decide};
pub use store::{AuthReader, SessionStore};


/// Local view of the provider session.
///
/// While `initializing` is true, `session` is not authoritative and
/// session-dependent UI must not render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub initializing: bool,
    /// Advisory message from a failed initial lookup.
    pub last_error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { session: None, initializing: true, last_error: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.initializing && self.session.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.user)
    }
}

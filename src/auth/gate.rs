//! Access gate for protected views.
//!
//! [`decide`] is the pure rule; [`AccessGate`] follows the store so an
//! already-rendered view is re-evaluated on every state change (for
//! example a session revoked elsewhere).

use tracing::debug;

use super::{AuthReader, AuthState};
use crate::identity::Session;

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

/// Unauthenticated entry point.
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Auth is still initializing: render nothing, decide later.
    Defer,
    /// No session: navigate to the given route without rendering the body.
    Redirect(&'static str),
    /// Session present: render the protected body.
    Render,
}

/// Outcome of wrapping a view with the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<V> {
    Defer,
    Redirect(&'static str),
    Render(V),
}

#[must_use]
pub fn decide(state: &AuthState) -> GateDecision {
    decide_with(state, LOGIN_ROUTE)
}

fn decide_with(state: &AuthState, redirect_to: &'static str) -> GateDecision {
    if state.initializing {
        GateDecision::Defer
    } else if state.session.is_none() {
        GateDecision::Redirect(redirect_to)
    } else {
        GateDecision::Render
    }
}

pub struct AccessGate {
    reader: AuthReader,
    redirect_to: &'static str,
}

impl AccessGate {
    #[must_use]
    pub fn new(reader: AuthReader) -> Self {
        Self { reader, redirect_to: LOGIN_ROUTE }
    }

    #[must_use]
    pub fn with_redirect(mut self, route: &'static str) -> Self {
        self.redirect_to = route;
        self
    }

    #[must_use]
    pub fn decision(&self) -> GateDecision {
        decide_with(&self.reader.current(), self.redirect_to)
    }

    /// Wrap a view. `body` runs only when the decision is `Render`.
    pub fn render<V>(&self, body: impl FnOnce(&Session) -> V) -> Gated<V> {
        let state = self.reader.current();
        match (decide_with(&state, self.redirect_to), state.session.as_ref()) {
            (GateDecision::Render, Some(session)) => Gated::Render(body(session)),
            (GateDecision::Redirect(route), _) => {
                debug!(%route, "access gate redirecting");
                Gated::Redirect(route)
            }
            _ => Gated::Defer,
        }
    }

    /// Wait for the next auth state change and return the new decision.
    /// `None` once the store is gone.
    pub async fn next_decision(&mut self) -> Option<GateDecision> {
        let state = self.reader.changed().await?;
        Some(decide_with(&state, self.redirect_to))
    }
}

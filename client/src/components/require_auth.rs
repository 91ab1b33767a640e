//! Route guard for authenticated screens.
//!
//! Renders nothing while the session lookup is pending, navigates to the
//! login route once it resolves without a session, and renders its children
//! only while a session is present. The decision is re-evaluated on every
//! auth state change, so signing out elsewhere hides the body immediately.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use mayfly::auth::{GateDecision, decide};

use crate::state::auth::use_auth;

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let decision = Memo::new(move |_| auth.state.with(decide));
    let navigate = use_navigate();

    Effect::new(move || {
        if let GateDecision::Redirect(route) = decision.get() {
            navigate(route, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || (decision.get() == GateDecision::Render).then(|| children())
}

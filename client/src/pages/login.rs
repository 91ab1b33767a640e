//! Email + password sign-in page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use mayfly::auth::AuthState;

use crate::state::auth::{advisory, use_auth};

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

const MISSING_FIELDS: &str = "Enter both email and password.";

/// Require both fields. The email is passed on as typed; the provider
/// decides what it accepts.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Leave as soon as a session shows up, whoever created it.
    Effect::new(move || {
        if auth.state.with(AuthState::is_authenticated) {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());
        let facade = auth.facade();
        leptos::task::spawn_local(async move {
            match facade.sign_in(&email_value, &password_value).await {
                Ok(()) => info.set(String::new()),
                Err(err) => info.set(err.to_string()),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"MayFly"</h1>
                <p class="login-card__subtitle">"Sign in to your account"</p>
                {move || {
                    auth.state
                        .with(advisory)
                        .map(|message| view! { <p class="login-message login-message--warn">{message}</p> })
                }}
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "No account yet? "
                    <A href="/register">"Create one"</A>
                </p>
            </div>
        </div>
    }
}

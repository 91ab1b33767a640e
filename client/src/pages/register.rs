//! Account registration page.
//!
//! Field validation, the username check, sign-up and profile creation all
//! happen in `mayfly::registration`; this page collects the form and routes
//! the new user to their profile.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use mayfly::registration::{MINIMUM_AGE, RegistrationForm};
use time::{Date, Month};

use crate::state::auth::use_auth;
use crate::state::backend::use_backend;
use crate::util::timers;

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

/// Latest birthdate that is old enough on `today`, as `YYYY-MM-DD`.
/// Used as the date input's `max`.
#[must_use]
pub fn latest_eligible_birthdate(today: Date) -> String {
    let year = today.year() - MINIMUM_AGE;
    let date = today
        .replace_year(year)
        .or_else(|_| Date::from_calendar_date(year, Month::February, 28))
        .unwrap_or(today);
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let birthdate = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let max_birthdate = latest_eligible_birthdate(timers::today());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = RegistrationForm {
            email: email.get(),
            password: password.get(),
            username: username.get(),
            birthdate: birthdate.get(),
        };
        busy.set(true);
        info.set("Creating your account...".to_owned());
        let registration = backend.with_value(|b| b.registration(auth.facade()));
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match registration.register(&form, timers::today()).await {
                Ok(_) => {
                    info.set(String::new());
                    navigate("/profile", NavigateOptions::default());
                }
                Err(err) => info.set(err.to_string()),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Join MayFly"</h1>
                <p class="login-card__subtitle">"You must be at least 18 years old."</p>
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
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <label class="login-label">
                        "Birthdate"
                        <input
                            class="login-input"
                            type="date"
                            max=max_birthdate
                            prop:value=move || birthdate.get()
                            on:input=move |ev| birthdate.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}

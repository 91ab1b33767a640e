//! Page chrome: top navigation, theme toggle, footer and cookie banner.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use mayfly::auth::{AuthState, LOGIN_ROUTE};

use crate::components::cookie_banner::CookieBanner;
use crate::state::auth::use_auth;
use crate::state::preferences::{use_consent, use_theme};
use crate::util::dark_mode;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();
    let consent = use_consent();
    let navigate = use_navigate();
    let notice = RwSignal::new(None::<String>);
    let signed_in = move || auth.state.with(AuthState::is_authenticated);

    let on_sign_out = move |_: leptos::ev::MouseEvent| {
        let navigate = navigate.clone();
        let facade = auth.facade();
        leptos::task::spawn_local(async move {
            match facade.sign_out().await {
                Ok(()) => {
                    notice.set(None);
                    navigate(LOGIN_ROUTE, NavigateOptions::default());
                }
                Err(err) => notice.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <div class="app-shell">
            <header class="top-nav">
                <A href="/" attr:class="top-nav__brand">"MayFly"</A>
                <nav class="top-nav__links">
                    <Show
                        when=signed_in
                        fallback=|| {
                            view! {
                                <A href="/login">"Sign in"</A>
                                <A href="/register">"Register"</A>
                            }
                        }
                    >
                        <A href="/">"Feed"</A>
                        <A href="/profile">"Profile"</A>
                        <button class="top-nav__button" on:click=on_sign_out.clone()>
                            "Sign out"
                        </button>
                    </Show>
                    <button class="top-nav__button" on:click=move |_| theme.toggle()>
                        {move || dark_mode::toggle_label(theme.theme.get())}
                    </button>
                </nav>
            </header>
            <Show when=move || notice.with(Option::is_some)>
                <p class="notice notice--error">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <main class="app-main">{children()}</main>
            <footer class="app-footer">
                <A href="/privacy">"Privacy Policy"</A>
                <A href="/terms">"Terms of Service"</A>
                <button class="app-footer__link" on:click=move |_| consent.open_preferences()>
                    "Cookie preferences"
                </button>
            </footer>
            <CookieBanner/>
        </div>
    }
}

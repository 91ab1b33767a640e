//! Cookie banner and preferences dialog bound to the consent machine.

use leptos::prelude::*;
use mayfly::consent::CookieCategory;

use crate::state::preferences::use_consent;

#[cfg(test)]
#[path = "cookie_banner_test.rs"]
mod cookie_banner_test;

#[must_use]
pub fn category_label(category: CookieCategory) -> &'static str {
    match category {
        CookieCategory::Necessary => "Necessary",
        CookieCategory::Analytics => "Analytics",
        CookieCategory::Marketing => "Marketing",
    }
}

#[must_use]
pub fn category_description(category: CookieCategory) -> &'static str {
    match category {
        CookieCategory::Necessary => "Required for sign-in and core features. Always on.",
        CookieCategory::Analytics => "Help us understand how the site is used.",
        CookieCategory::Marketing => "Used to show relevant content outside the site.",
    }
}

#[component]
pub fn CookieBanner() -> impl IntoView {
    let consent = use_consent();

    view! {
        <Show when=move || consent.view.with(|v| v.show_banner && !v.preferences_open)>
            <div class="cookie-banner" role="dialog" aria-label="Cookie consent">
                <p class="cookie-banner__text">
                    "We use cookies to keep you signed in and, with your permission, to improve the site. "
                    <a href="/privacy">"Privacy Policy"</a>
                </p>
                <div class="cookie-banner__actions">
                    <button on:click=move |_| consent.reject_all()>"Reject all"</button>
                    <button on:click=move |_| consent.open_preferences()>"Customize"</button>
                    <button class="cookie-banner__primary" on:click=move |_| consent.accept_all()>
                        "Accept all"
                    </button>
                </div>
            </div>
        </Show>
        <Show when=move || consent.view.with(|v| v.preferences_open)>
            <CookiePreferences/>
        </Show>
    }
}

#[component]
fn CookiePreferences() -> impl IntoView {
    let consent = use_consent();
    let draft = RwSignal::new(consent.view.with_untracked(|v| v.record));

    let rows = CookieCategory::ALL
        .into_iter()
        .map(|category| {
            view! {
                <label class="cookie-prefs__row">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(|r| r.get(category))
                        disabled=category.is_required()
                        on:change=move |ev| {
                            let enabled = event_target_checked(&ev);
                            draft.update(|r| r.set(category, enabled));
                        }
                    />
                    <span class="cookie-prefs__name">{category_label(category)}</span>
                    <span class="cookie-prefs__desc">{category_description(category)}</span>
                </label>
            }
        })
        .collect_view();

    view! {
        <div class="dialog-backdrop">
            <div class="dialog cookie-prefs" role="dialog" aria-label="Cookie preferences">
                <h2>"Cookie preferences"</h2>
                {rows}
                <div class="dialog__actions">
                    <button on:click=move |_| consent.withdraw()>"Withdraw consent"</button>
                    <button on:click=move |_| consent.close_preferences()>"Cancel"</button>
                    <button
                        class="dialog__primary"
                        on:click=move |_| consent.save_preferences(draft.get_untracked())
                    >
                        "Save preferences"
                    </button>
                </div>
            </div>
        </div>
    }
}


//! Static privacy policy and terms of service pages.

use leptos::prelude::*;
use leptos_router::components::A;
use mayfly::consent::CookieCategory;

use crate::components::cookie_banner::{category_description, category_label};
use crate::state::preferences::use_consent;

#[component]
pub fn PrivacyPage() -> impl IntoView {
    let consent = use_consent();
    let categories = CookieCategory::ALL
        .into_iter()
        .map(|category| {
            view! {
                <li>
                    <strong>{category_label(category)}</strong>
                    ": "
                    {category_description(category)}
                </li>
            }
        })
        .collect_view();

    view! {
        <article class="legal">
            <h1>"Privacy Policy"</h1>
            <h2>"What we store"</h2>
            <p>
                "Your email address, username, optional profile details and avatar, the posts you \
                 publish and the posts you like. Your birthdate is checked at registration and is not stored."
            </p>
            <h2>"Cookies and local storage"</h2>
            <p>"Your browser keeps your sign-in session, theme choice and cookie preferences."</p>
            <ul>{categories}</ul>
            <p>
                <button class="legal__link" on:click=move |_| consent.open_preferences()>
                    "Change cookie preferences"
                </button>
            </p>
            <h2>"Your rights"</h2>
            <p>"You can edit your profile at any time and withdraw cookie consent from the preferences dialog."</p>
            <A href="/">"Back to MayFly"</A>
        </article>
    }
}

#[component]
pub fn TermsPage() -> impl IntoView {
    view! {
        <article class="legal">
            <h1>"Terms of Service"</h1>
            <h2>"Eligibility"</h2>
            <p>"You must be at least 18 years old to create an account."</p>
            <h2>"Your content"</h2>
            <p>
                "Posts are limited to 280 characters. You are responsible for what you publish \
                 and may edit or delete your own posts at any time."
            </p>
            <h2>"Conduct"</h2>
            <p>"Do not post unlawful, abusive or misleading content, and do not impersonate others."</p>
            <A href="/">"Back to MayFly"</A>
        </article>
    }
}

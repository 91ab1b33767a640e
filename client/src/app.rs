//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Redirect, Route, Router, Routes};
use mayfly::storage::KeyValueStore;

use crate::components::layout::Layout;
use crate::components::require_auth::RequireAuth;
use crate::pages::home::HomePage;
use crate::pages::legal::{PrivacyPage, TermsPage};
use crate::pages::login::LoginPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::state::auth::provide_auth;
use crate::state::backend::{self, Backend, provide_backend};
use crate::state::preferences::provide_preferences;
use crate::util::storage::BrowserStore;

/// Root application component.
///
/// Builds the backend and the session store exactly once, then provides
/// auth, preferences and backend contexts to every route.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store: Rc<dyn KeyValueStore> = Rc::new(BrowserStore::new());
    let backend = Backend::connect(backend::config(), store.clone());
    provide_auth(backend.auth.clone());
    provide_preferences(store);
    provide_backend(backend);

    view! {
        <Title text="MayFly"/>

        <Router>
            <Layout>
                <Routes fallback=|| view! { <Redirect path="/"/> }>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=StaticSegment("privacy") view=PrivacyPage/>
                    <Route path=StaticSegment("terms") view=TermsPage/>
                    <Route
                        path=StaticSegment("")
                        view=|| view! { <RequireAuth><HomePage/></RequireAuth> }
                    />
                    <Route
                        path=StaticSegment("profile")
                        view=|| view! { <RequireAuth><ProfilePage/></RequireAuth> }
                    />
                </Routes>
            </Layout>
        </Router>
    }
}

//! Backend adapters and the services built on them.
//!
//! The browser only ever holds the anonymous project key. No admin client is
//! built here, so a failed profile insert during registration leaves the new
//! account in place and logs it.

use std::rc::Rc;

use leptos::prelude::*;
use mayfly::SupabaseConfig;
use mayfly::auth::AuthFacade;
use mayfly::feed::FeedService;
use mayfly::profiles::ProfileService;
use mayfly::registration::Registration;
use mayfly::storage::KeyValueStore;
use mayfly::supabase::{SupabaseAuth, SupabaseRest};

use crate::util::timers;

const DEFAULT_URL: &str = "http://localhost:54321";

/// Project settings baked in at build time.
#[must_use]
pub fn config() -> SupabaseConfig {
    SupabaseConfig::new(
        option_env!("SUPABASE_URL").unwrap_or(DEFAULT_URL),
        option_env!("SUPABASE_ANON_KEY").unwrap_or_default(),
    )
}

#[derive(Clone)]
pub struct Backend {
    pub config: SupabaseConfig,
    pub auth: Rc<SupabaseAuth>,
    pub rest: Rc<SupabaseRest>,
}

impl Backend {
    #[must_use]
    pub fn connect(config: SupabaseConfig, store: Rc<dyn KeyValueStore>) -> Self {
        let auth = Rc::new(SupabaseAuth::new(&config, store));
        let rest = Rc::new(SupabaseRest::new(&config, auth.clone()));
        Self { config, auth, rest }
    }

    #[must_use]
    pub fn feed(&self) -> FeedService {
        FeedService::new(self.rest.clone(), self.rest.clone(), self.config.retry, timers::sleep())
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.rest.clone(), self.rest.clone(), self.config.retry, timers::sleep())
    }

    #[must_use]
    pub fn registration(&self, facade: AuthFacade) -> Registration {
        Registration::new(facade, self.rest.clone())
    }
}

/// Copyable handle to the backend, safe to capture in views and handlers.
pub type BackendHandle = StoredValue<Backend, LocalStorage>;

pub fn provide_backend(backend: Backend) -> BackendHandle {
    let handle = StoredValue::new_local(backend);
    provide_context(handle);
    handle
}

pub fn use_backend() -> BackendHandle {
    expect_context::<BackendHandle>()
}

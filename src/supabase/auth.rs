//! Identity provider over the GoTrue REST API.
//!
//! The token bundle is persisted under [`AUTH_SESSION_KEY`] so a reload
//! restores the session. Every change to it (sign-in, sign-up with an
//! immediate session, refresh, sign-out) is pushed to subscribers.
//!
//! The access token is refreshed lazily: at the initial lookup and before
//! every data request that would otherwise carry a token about to expire.
//! A rejected refresh token signs the user out.

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::{PasswordGrant, RefreshGrant, SignUpResponse, StoredSession, TokenResponse};
use super::{APIKEY_HEADER, authorize, send_checked, unix_now};
use crate::config::SupabaseConfig;
use crate::error::{ErrorKind, ProviderError};
use crate::identity::{Identity, IdentityProvider, ListenerRegistry, Session, SessionCallback, Subscription};
use crate::storage::{AUTH_SESSION_KEY, KeyValueStore, load_json, save_json};

/// Refresh the access token when it expires within this many seconds.
pub const REFRESH_MARGIN_SECS: i64 = 60;

pub struct SupabaseAuth {
    http: Client,
    base_url: String,
    anon_key: String,
    store: Rc<dyn KeyValueStore>,
    listeners: ListenerRegistry,
    clock: Rc<dyn Fn() -> i64>,
    refreshing: Mutex<()>,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(config: &SupabaseConfig, store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            store,
            listeners: ListenerRegistry::new(),
            clock: Rc::new(unix_now),
            refreshing: Mutex::new(()),
        }
    }

    /// Replace the Unix-seconds clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    /// Access token of the persisted session, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.stored().map(|s| s.access_token)
    }

    /// Access token for an outgoing request, refreshed first when it
    /// expires within [`REFRESH_MARGIN_SECS`]. `None` when signed out,
    /// including when the refresh token was rejected.
    ///
    /// # Errors
    ///
    /// Returns an error when the refresh fails for any reason other than a
    /// rejected refresh token.
    pub async fn fresh_access_token(&self) -> Result<Option<String>, ProviderError> {
        Ok(self.current_session().await?.map(|s| s.access_token))
    }

    /// Persisted session, refreshed when close to expiry. Concurrent callers
    /// wait for a single refresh instead of spending the refresh token twice.
    async fn current_session(&self) -> Result<Option<StoredSession>, ProviderError> {
        match self.stored() {
            Some(stored) if !stored.expires_within((self.clock)(), REFRESH_MARGIN_SECS) => return Ok(Some(stored)),
            None => return Ok(None),
            Some(_) => {}
        }
        let _guard = self.refreshing.lock().await;
        let Some(stored) = self.stored() else {
            return Ok(None);
        };
        if !stored.expires_within((self.clock)(), REFRESH_MARGIN_SECS) {
            return Ok(Some(stored));
        }
        self.refresh(&stored).await
    }

    fn stored(&self) -> Option<StoredSession> {
        load_json(self.store.as_ref(), AUTH_SESSION_KEY)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Persist a new token bundle and tell subscribers.
    fn adopt(&self, stored: &StoredSession) -> Session {
        save_json(self.store.as_ref(), AUTH_SESSION_KEY, stored);
        let session = stored.session();
        self.listeners.notify(Some(&session));
        session
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove(AUTH_SESSION_KEY) {
            warn!(error = %e, "failed to clear persisted session");
        }
    }

    async fn token(&self, grant_type: &str, body: &impl serde::Serialize) -> Result<StoredSession, ProviderError> {
        let request = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header(APIKEY_HEADER, &self.anon_key)
            .json(body);
        let token: TokenResponse = send_checked(request).await?.json().await?;
        Ok(token.into_stored((self.clock)()))
    }

    async fn refresh(&self, stored: &StoredSession) -> Result<Option<StoredSession>, ProviderError> {
        let grant = RefreshGrant { refresh_token: &stored.refresh_token };
        match self.token("refresh_token", &grant).await {
            Ok(refreshed) => {
                debug!(user_id = %refreshed.user.id, "session refreshed");
                self.adopt(&refreshed);
                Ok(Some(refreshed))
            }
            Err(e) if e.kind() == ErrorKind::Credential => {
                info!(error = %e, "refresh token rejected; discarding persisted session");
                self.clear();
                self.listeners.notify(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for SupabaseAuth {
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.current_session().await?.as_ref().map(StoredSession::session))
    }

    fn subscribe(&self, callback: SessionCallback) -> Subscription {
        self.listeners.register(callback)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let stored = self.token("password", &PasswordGrant { email, password }).await?;
        info!(user_id = %stored.user.id, "password sign-in succeeded");
        self.adopt(&stored);
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, ProviderError> {
        let request = self
            .http
            .post(self.endpoint("signup"))
            .header(APIKEY_HEADER, &self.anon_key)
            .json(&PasswordGrant { email, password });
        let response: SignUpResponse = send_checked(request).await?.json().await?;
        match response {
            SignUpResponse::Session(token) => {
                let stored = token.into_stored((self.clock)());
                self.adopt(&stored);
                Ok(Some(stored.user))
            }
            SignUpResponse::User(user) => {
                debug!(user_id = %user.id, "sign-up awaiting confirmation");
                Ok(Some(user.into()))
            }
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(stored) = self.stored() {
            let request = authorize(self.http.post(self.endpoint("logout")), &self.anon_key, &stored.access_token);
            match send_checked(request).await {
                Ok(_) => {}
                // The token is already invalid server-side; finish locally.
                Err(ProviderError::Rejected { status: 401 | 403 | 404, .. }) => {
                    debug!("logout token already invalid");
                }
                Err(e) => return Err(e),
            }
        }
        self.clear();
        self.listeners.notify(None);
        info!("signed out");
        Ok(())
    }
}

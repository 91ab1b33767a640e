//! Boundary with the remote identity provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store, the auth facade and the registration flow talk to the
//! provider only through [`IdentityProvider`]. The HTTP implementation lives
//! in `crate::supabase`; tests use scripted fakes.
//!
//! The client runs on a single-threaded event loop, so provider futures are
//! `?Send` and callbacks are plain `Fn`.

pub mod listeners;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use listeners::ListenerRegistry;

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Authenticated account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque provider-assigned user id.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None }
    }
}

/// Provider-confirmed proof that an identity is signed in.
///
/// Tokens stay inside the provider implementation; this is all the rest of
/// the app sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Identity,
}

impl Session {
    #[must_use]
    pub fn for_user(id: impl Into<String>) -> Self {
        Self { user: Identity::new(id) }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Callback invoked with the new session (or `None`) on every change.
pub type SessionCallback = Box<dyn Fn(Option<Session>)>;

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Cancellation handle for a session-change subscription.
///
/// Cancelling (explicitly or by drop) runs the release hook exactly once.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn cancel(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

// =============================================================================
// PROVIDER TRAITS
// =============================================================================

#[async_trait(?Send)]
pub trait IdentityProvider {
    /// One-shot lookup of the current session.
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Register for session-change notifications until the handle is released.
    fn subscribe(&self, callback: SessionCallback) -> Subscription;

    /// Exchange email and password for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError>;

    /// Create an account. `Ok(None)` means the provider accepted the request
    /// but returned no identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, ProviderError>;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}

/// Privileged account management. Requires a service-role credential and
/// must never be constructed from end-user credentials.
#[async_trait(?Send)]
pub trait IdentityAdmin {
    async fn delete_user(&self, user_id: &str) -> Result<(), ProviderError>;
}

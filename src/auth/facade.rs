//! Sign-in, sign-up and sign-out against the identity provider.
//!
//! None of these touch the session store. A successful call is observed by
//! the store through its subscription, so callers must read the store (not
//! their own call's completion) to learn the resulting session.

use std::rc::Rc;

use tracing::{info, warn};

use crate::error::{AuthError, ErrorKind, SIGN_UP_FAILED};
use crate::identity::{Identity, IdentityProvider};

#[cfg(test)]
#[path = "facade_test.rs"]
mod facade_test;

/// Result pair of an account creation, mirroring the provider contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub identity: Option<Identity>,
    pub error: Option<AuthError>,
}

impl SignUpOutcome {
    /// Collapse the pair: an error wins, and a missing identity without an
    /// error is itself a failure.
    ///
    /// # Errors
    ///
    /// Returns the reported error, or a generic sign-up error when the
    /// provider returned neither.
    pub fn into_result(self) -> Result<Identity, AuthError> {
        match (self.identity, self.error) {
            (_, Some(err)) => Err(err),
            (Some(identity), None) => Ok(identity),
            (None, None) => Err(AuthError::new(ErrorKind::Service, SIGN_UP_FAILED)),
        }
    }
}

#[derive(Clone)]
pub struct AuthFacade {
    provider: Rc<dyn IdentityProvider>,
}

impl AuthFacade {
    #[must_use]
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// # Errors
    ///
    /// Returns a generic sign-in error; provider detail is only logged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(()) => {
                info!("sign-in accepted");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "sign-in failed");
                Err(AuthError::sign_in(&e))
            }
        }
    }

    /// Create an account. Never fails by itself: errors come back inside the
    /// outcome so the registration flow can branch on them.
    pub async fn sign_up(&self, email: &str, password: &str) -> SignUpOutcome {
        match self.provider.sign_up(email, password).await {
            Ok(identity) => {
                info!(user_id = ?identity.as_ref().map(|i| i.id.as_str()), "sign-up accepted");
                SignUpOutcome { identity, error: None }
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "sign-up failed");
                SignUpOutcome { identity: None, error: Some(AuthError::sign_up(&e)) }
            }
        }
    }

    /// # Errors
    ///
    /// Returns a generic sign-out error. The local session is left as the
    /// provider last confirmed it.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                info!("sign-out accepted");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "sign-out failed");
                Err(AuthError::sign_out(&e))
            }
        }
    }
}

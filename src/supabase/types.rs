//! Wire types for the hosted auth and REST endpoints.

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Session};

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

/// Token bundle persisted between runs under `mayfly.auth.session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub user: Identity,
}

impl StoredSession {
    #[must_use]
    pub fn session(&self) -> Session {
        Session { user: self.user.clone() }
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at.saturating_sub(now) <= margin_secs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Identity { id: user.id, email: user.email }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: UserResponse,
}

impl TokenResponse {
    pub(crate) fn into_stored(self, now: i64) -> StoredSession {
        let expires_at = self.expires_at.unwrap_or_else(|| now.saturating_add(self.expires_in.unwrap_or(3600)));
        StoredSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign-up answers with a full session when email confirmation is off and
/// with the bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(UserResponse),
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

//! HTTP adapters for a Supabase-compatible backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! - [`SupabaseAuth`]: the [`crate::identity::IdentityProvider`] over the
//!   GoTrue endpoints, with the session persisted in a key-value store.
//! - [`SupabaseAdmin`]: privileged account deletion with the service-role
//!   key. Never build it in a browser.
//! - [`SupabaseRest`]: profile, post, like and avatar storage over PostgREST
//!   and the object storage API, authorized with the signed-in user's token.
//!
//! No request timeout is configured locally; callers inherit whatever the
//! transport enforces.

pub mod admin;
pub mod auth;
pub mod rest;
pub mod types;

use reqwest::{RequestBuilder, Response};

use crate::error::ProviderError;

pub use admin::SupabaseAdmin;
pub use auth::SupabaseAuth;
pub use rest::SupabaseRest;
pub use types::StoredSession;

pub(crate) const APIKEY_HEADER: &str = "apikey";

/// Send a request and turn a non-2xx answer into a [`ProviderError`].
pub(crate) async fn send_checked(request: RequestBuilder) -> Result<Response, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::from_status(status.as_u16(), body))
}

/// Attach the project key and a bearer token.
pub(crate) fn authorize(request: RequestBuilder, api_key: &str, bearer: &str) -> RequestBuilder {
    request.header(APIKEY_HEADER, api_key).bearer_auth(bearer)
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

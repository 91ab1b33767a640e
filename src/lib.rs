//! Core of the MayFly social-feed client.
//!
//! This crate owns everything that is not markup: the authentication
//! lifecycle (session store, auth facade, access gate), consent and theme
//! persistence, the bounded fetch retry, and the profile, registration and
//! feed flows over a Supabase-compatible backend. It is single-threaded by
//! construction (`Rc`, `?Send` futures) so the same code runs on the browser
//! event loop and under a current-thread tokio runtime.

pub mod auth;
pub mod config;
pub mod consent;
pub mod error;
pub mod feed;
pub mod identity;
pub mod profiles;
pub mod registration;
pub mod retry;
pub mod storage;
pub mod supabase;
pub mod theme;

#[cfg(test)]
pub mod test_helpers;

pub use auth::{AccessGate, AuthFacade, AuthReader, AuthState, GateDecision, SessionStore};
pub use config::SupabaseConfig;
pub use error::{AuthError, ErrorKind, ProviderError};
pub use identity::{Identity, IdentityAdmin, IdentityProvider, Session, Subscription};

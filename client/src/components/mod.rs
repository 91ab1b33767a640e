//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome and the route guard while reading/writing
//! shared state from Leptos context providers.

pub mod cookie_banner;
pub mod layout;
pub mod require_auth;

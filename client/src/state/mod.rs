//! Reactive application state provided through Leptos context.
//!
//! DESIGN
//! ======
//! Framework-agnostic state machines live in the `mayfly` core crate. The
//! modules here only bridge them into signals and own their lifetime.

pub mod auth;
pub mod backend;
pub mod preferences;

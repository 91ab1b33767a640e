//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Business rules live in the `mayfly` core crate.

pub mod home;
pub mod legal;
pub mod login;
pub mod profile;
pub mod register;

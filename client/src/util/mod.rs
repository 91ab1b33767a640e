//! Browser shims behind the core crate's seams.
//!
//! `storage` backs `KeyValueStore` with `localStorage`, `timers` supplies the
//! retry sleep and today's date, `files` reads picked avatar images, and
//! `dark_mode` reflects the theme on `<html>`. Each degrades to a no-op or an
//! in-memory stand-in outside the `hydrate` build.

pub mod dark_mode;
pub mod files;
pub mod storage;
pub mod timers;

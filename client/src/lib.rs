//! # mayfly-client
//!
//! Leptos + WASM frontend for the MayFly social feed.
//!
//! This crate contains pages, components and the reactive state that wraps
//! the `mayfly` core: the session store, the auth facade, the access gate,
//! and the theme and consent preferences.

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("mayfly client starting");
    leptos::mount::hydrate_body(app::App);
}

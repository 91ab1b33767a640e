//! Dark mode application on the document root.
//!
//! The preference itself is persisted by `mayfly::theme`; this module only
//! reflects it on `<html>` as a `dark` class and a `data-theme` attribute.
//! Requires a browser environment.
//!
//! TRADE-OFFS
//! ==========
//! SSR paths no-op to keep server rendering deterministic.

use mayfly::theme::Theme;

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

/// CSS class toggled on `<html>` for the dark theme.
pub const DARK_CLASS: &str = "dark";

/// Label for the toggle button: it names the theme a click switches to.
#[must_use]
pub fn toggle_label(current: Theme) -> &'static str {
    if current.is_dark() { "Light mode" } else { "Dark mode" }
}

/// Reflect `theme` on the `<html>` element.
pub fn apply(theme: Theme) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            let classes = el.class_list();
            let _ = if theme.is_dark() { classes.add_1(DARK_CLASS) } else { classes.remove_1(DARK_CLASS) };
            let _ = el.set_attribute("data-theme", theme.as_str());
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = theme;
    }
}

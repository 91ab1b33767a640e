#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn toggle_label_names_the_other_theme() {
    assert_eq!(toggle_label(Theme::Light), "Dark mode");
    assert_eq!(toggle_label(Theme::Dark), "Light mode");
}

#[test]
fn apply_is_noop_but_callable() {
    apply(Theme::Dark);
    apply(Theme::Light);
}

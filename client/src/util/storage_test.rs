#![cfg(not(feature = "hydrate"))]

use std::rc::Rc;

use mayfly::storage::{KeyValueStore, THEME_KEY};
use mayfly::theme::{Theme, ThemePreference};

use super::*;

#[test]
fn fallback_round_trips_values() {
    let store = BrowserStore::new();
    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn theme_preference_persists_through_store() {
    let store: Rc<dyn KeyValueStore> = Rc::new(BrowserStore::new());
    let mut pref = ThemePreference::load(store.clone());
    pref.set(Theme::Dark);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(ThemePreference::load(store).current(), Theme::Dark);
}

//! Theme and cookie-consent state.
//!
//! DESIGN
//! ======
//! The persisted state machines (`ThemePreference`, `ConsentManager`) are the
//! source of truth; signals are refreshed from them after every transition
//! so views never write the store directly.

use std::rc::Rc;

use leptos::prelude::*;
use mayfly::consent::{ConsentManager, ConsentRecord, ConsentUpdate};
use mayfly::storage::KeyValueStore;
use mayfly::theme::{Theme, ThemePreference};

use crate::util::dark_mode;

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
    pref: StoredValue<ThemePreference, LocalStorage>,
}

impl ThemeContext {
    pub fn toggle(&self) {
        self.pref.update_value(|pref| {
            pref.toggle();
        });
        let next = self.pref.with_value(ThemePreference::current);
        dark_mode::apply(next);
        self.theme.set(next);
    }
}

/// Snapshot of the consent machine for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentView {
    pub record: ConsentRecord,
    pub show_banner: bool,
    pub preferences_open: bool,
}

impl ConsentView {
    fn of(manager: &ConsentManager) -> Self {
        Self {
            record: manager.record(),
            show_banner: manager.show_banner(),
            preferences_open: manager.preferences_open(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct ConsentContext {
    pub view: RwSignal<ConsentView>,
    manager: StoredValue<ConsentManager, LocalStorage>,
}

impl ConsentContext {
    fn apply(&self, transition: impl FnOnce(&mut ConsentManager)) {
        self.manager.update_value(transition);
        self.view.set(self.manager.with_value(ConsentView::of));
    }

    pub fn accept_all(&self) {
        self.apply(|m| {
            m.accept_all();
        });
    }

    pub fn reject_all(&self) {
        self.apply(|m| {
            m.reject_all();
        });
    }

    pub fn withdraw(&self) {
        self.apply(|m| {
            m.withdraw_consent();
        });
    }

    pub fn update(&self, update: ConsentUpdate) {
        self.apply(|m| {
            m.update_consent(update);
        });
    }

    pub fn save_preferences(&self, record: ConsentRecord) {
        self.apply(|m| {
            m.save_preferences(record);
        });
    }

    pub fn open_preferences(&self) {
        self.apply(ConsentManager::open_preferences);
    }

    pub fn close_preferences(&self) {
        self.apply(ConsentManager::close_preferences);
    }
}

/// Load theme and consent from `store`, apply the theme, provide both.
pub fn provide_preferences(store: Rc<dyn KeyValueStore>) -> (ThemeContext, ConsentContext) {
    let pref = ThemePreference::load(store.clone());
    let theme = RwSignal::new(pref.current());
    dark_mode::apply(pref.current());
    let theme_ctx = ThemeContext { theme, pref: StoredValue::new_local(pref) };

    let manager = ConsentManager::load(store);
    let consent_ctx =
        ConsentContext { view: RwSignal::new(ConsentView::of(&manager)), manager: StoredValue::new_local(manager) };

    provide_context(theme_ctx);
    provide_context(consent_ctx);
    (theme_ctx, consent_ctx)
}

pub fn use_theme() -> ThemeContext {
    expect_context::<ThemeContext>()
}

pub fn use_consent() -> ConsentContext {
    expect_context::<ConsentContext>()
}

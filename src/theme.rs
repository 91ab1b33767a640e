//! Dark mode preference.
//!
//! Reads the stored `theme` value at startup and writes it back on every
//! toggle. Applying the theme to a document is the UI layer's job.

use std::rc::Rc;

use tracing::warn;

use crate::storage::{KeyValueStore, THEME_KEY};

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stored value; anything but `"dark"` reads as light.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "dark" { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

pub struct ThemePreference {
    store: Rc<dyn KeyValueStore>,
    current: Theme,
}

impl ThemePreference {
    /// Load the persisted theme, defaulting to light.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(raw) => raw.as_deref().map(Theme::parse).unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "theme read failed, using light");
                Theme::Light
            }
        };
        Self { store, current }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme and persist it.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            warn!(error = %e, theme = theme.as_str(), "theme write failed");
        }
        theme
    }
}

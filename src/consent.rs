//! Cookie consent state machine.
//!
//! DESIGN
//! ======
//! Two states: `Undecided` (nothing persisted) and `Decided`. Every choice
//! (accept all, reject all, partial update, preferences save, withdrawal)
//! writes a complete [`ConsentRecord`] and moves to `Decided`, which hides
//! the banner. Opening the preferences dialog is a side state that does not
//! change the decision.
//!
//! `necessary` is forced to `true` on every load and write.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::{self, COOKIE_CONSENT_KEY, KeyValueStore};

#[cfg(test)]
#[path = "consent_test.rs"]
mod consent_test;

// =============================================================================
// RECORD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
}

impl Default for ConsentRecord {
    fn default() -> Self {
        Self::necessary_only()
    }
}

impl ConsentRecord {
    #[must_use]
    pub fn necessary_only() -> Self {
        Self { necessary: true, analytics: false, marketing: false }
    }

    #[must_use]
    pub fn all() -> Self {
        Self { necessary: true, analytics: true, marketing: true }
    }

    #[must_use]
    pub fn get(&self, category: CookieCategory) -> bool {
        match category {
            CookieCategory::Necessary => self.necessary,
            CookieCategory::Analytics => self.analytics,
            CookieCategory::Marketing => self.marketing,
        }
    }

    /// Set one category. `Necessary` cannot be turned off.
    pub fn set(&mut self, category: CookieCategory, enabled: bool) {
        match category {
            CookieCategory::Necessary => {}
            CookieCategory::Analytics => self.analytics = enabled,
            CookieCategory::Marketing => self.marketing = enabled,
        }
    }

    #[must_use]
    pub fn merged(mut self, update: ConsentUpdate) -> Self {
        if let Some(analytics) = update.analytics {
            self.analytics = analytics;
        }
        if let Some(marketing) = update.marketing {
            self.marketing = marketing;
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.necessary = true;
        self
    }
}

/// Partial consent change; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsentUpdate {
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieCategory {
    Necessary,
    Analytics,
    Marketing,
}

impl CookieCategory {
    pub const ALL: [Self; 3] = [Self::Necessary, Self::Analytics, Self::Marketing];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        self == Self::Necessary
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Undecided,
    Decided,
}

pub struct ConsentManager {
    store: Rc<dyn KeyValueStore>,
    record: ConsentRecord,
    status: ConsentStatus,
    preferences_open: bool,
}

impl ConsentManager {
    /// Load the persisted record. A missing or unreadable record leaves the
    /// machine `Undecided` with defaults.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let persisted = storage::load_json::<ConsentRecord>(store.as_ref(), COOKIE_CONSENT_KEY);
        let (record, status) = match persisted {
            Some(record) => (record.normalized(), ConsentStatus::Decided),
            None => (ConsentRecord::default(), ConsentStatus::Undecided),
        };
        debug!(?status, "consent loaded");
        Self { store, record, status, preferences_open: false }
    }

    #[must_use]
    pub fn record(&self) -> ConsentRecord {
        self.record
    }

    #[must_use]
    pub fn status(&self) -> ConsentStatus {
        self.status
    }

    #[must_use]
    pub fn show_banner(&self) -> bool {
        self.status == ConsentStatus::Undecided
    }

    #[must_use]
    pub fn preferences_open(&self) -> bool {
        self.preferences_open
    }

    pub fn accept_all(&mut self) -> ConsentRecord {
        self.save(ConsentRecord::all())
    }

    pub fn reject_all(&mut self) -> ConsentRecord {
        self.save(ConsentRecord::necessary_only())
    }

    /// Revoke optional categories after a previous decision.
    pub fn withdraw_consent(&mut self) -> ConsentRecord {
        self.save(ConsentRecord::necessary_only())
    }

    pub fn update_consent(&mut self, update: ConsentUpdate) -> ConsentRecord {
        self.save(self.record.merged(update))
    }

    pub fn open_preferences(&mut self) {
        self.preferences_open = true;
    }

    pub fn close_preferences(&mut self) {
        self.preferences_open = false;
    }

    /// Save the record edited in the preferences dialog.
    pub fn save_preferences(&mut self, record: ConsentRecord) -> ConsentRecord {
        self.update_consent(ConsentUpdate { analytics: Some(record.analytics), marketing: Some(record.marketing) })
    }

    fn save(&mut self, record: ConsentRecord) -> ConsentRecord {
        let record = record.normalized();
        storage::save_json(self.store.as_ref(), COOKIE_CONSENT_KEY, &record);
        self.record = record;
        self.status = ConsentStatus::Decided;
        self.preferences_open = false;
        debug!(analytics = record.analytics, marketing = record.marketing, "consent saved");
        record
    }
}

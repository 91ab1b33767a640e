//! Account registration: validation, account creation and the profile row.
//!
//! FLOW
//! ====
//! 1. Validate the form locally (birthdate present, parseable, 18+ on
//!    `today`, username non-blank).
//! 2. Reject a username that already has a profile.
//! 3. Create the account through the auth facade.
//! 4. Insert the profile row. If that fails, delete the new account through
//!    the privileged admin client when one is configured. Failures of that
//!    compensation are logged and swallowed.
//!
//! Everything after step 1 reports a single generic error to the user.

use std::rc::Rc;

use time::Date;
use time::macros::format_description;
use tracing::{error, info, warn};

use crate::auth::AuthFacade;
use crate::identity::{Identity, IdentityAdmin};
use crate::profiles::{NewProfile, ProfileRepository};

#[cfg(test)]
#[path = "registration_test.rs"]
mod registration_test;

pub const MINIMUM_AGE: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Birthdate is required.")]
    MissingBirthdate,

    #[error("Birthdate must be a valid date (YYYY-MM-DD).")]
    InvalidBirthdate,

    #[error("You must be at least 18 years old to register.")]
    Underage,

    #[error("Username is required.")]
    MissingUsername,

    #[error("This username is already taken.")]
    UsernameTaken,

    #[error("Registration failed. Please try again.")]
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub username: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    pub birthdate: String,
}

/// Form fields after local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub birthdate: Date,
}

/// Full years between `birthdate` and `today`.
#[must_use]
pub fn age_on(birthdate: Date, today: Date) -> i32 {
    let years = today.year() - birthdate.year();
    if (u8::from(today.month()), today.day()) < (u8::from(birthdate.month()), birthdate.day()) {
        years - 1
    } else {
        years
    }
}

/// # Errors
///
/// Returns the first failing rule, checked in the order birthdate present,
/// birthdate parses, minimum age, username present.
pub fn validate(form: &RegistrationForm, today: Date) -> Result<ValidRegistration, RegistrationError> {
    let raw = form.birthdate.trim();
    if raw.is_empty() {
        return Err(RegistrationError::MissingBirthdate);
    }
    let birthdate =
        Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| RegistrationError::InvalidBirthdate)?;
    if age_on(birthdate, today) < MINIMUM_AGE {
        return Err(RegistrationError::Underage);
    }
    let username = form.username.trim();
    if username.is_empty() {
        return Err(RegistrationError::MissingUsername);
    }
    Ok(ValidRegistration { username: username.to_owned(), birthdate })
}

pub struct Registration {
    facade: AuthFacade,
    profiles: Rc<dyn ProfileRepository>,
    admin: Option<Rc<dyn IdentityAdmin>>,
}

impl Registration {
    #[must_use]
    pub fn new(facade: AuthFacade, profiles: Rc<dyn ProfileRepository>) -> Self {
        Self { facade, profiles, admin: None }
    }

    /// Enable compensating deletion. Only hand in an admin client in a
    /// privileged context.
    #[must_use]
    pub fn with_admin(mut self, admin: Rc<dyn IdentityAdmin>) -> Self {
        self.admin = Some(admin);
        self
    }

    /// # Errors
    ///
    /// Returns a validation error, `UsernameTaken`, or `Failed` for any
    /// provider or store failure.
    pub async fn register(&self, form: &RegistrationForm, today: Date) -> Result<Identity, RegistrationError> {
        let valid = validate(form, today)?;

        match self.profiles.username_exists(&valid.username).await {
            Ok(false) => {}
            Ok(true) => return Err(RegistrationError::UsernameTaken),
            Err(e) => {
                warn!(error = %e, "username availability check failed");
                return Err(RegistrationError::Failed);
            }
        }

        let identity = self.facade.sign_up(&form.email, &form.password).await.into_result().map_err(|e| {
            warn!(kind = ?e.kind(), "registration sign-up failed");
            RegistrationError::Failed
        })?;

        let row = NewProfile { id: identity.id.clone(), username: valid.username };
        if let Err(e) = self.profiles.insert(&row).await {
            error!(user_id = %identity.id, error = %e, "profile creation failed after sign-up");
            self.compensate(&identity.id).await;
            return Err(RegistrationError::Failed);
        }

        info!(user_id = %identity.id, "registration complete");
        Ok(identity)
    }

    async fn compensate(&self, user_id: &str) {
        let Some(admin) = &self.admin else {
            warn!(%user_id, "no admin client configured; orphaned account left in place");
            return;
        };
        match admin.delete_user(user_id).await {
            Ok(()) => info!(%user_id, "rolled back account after profile failure"),
            Err(e) => warn!(%user_id, error = %e, "account rollback failed"),
        }
    }
}

//! User profiles and avatar uploads.
//!
//! SYSTEM CONTEXT
//! ==============
//! Profiles live in the hosted data store, one row per identity, keyed by the
//! identity id. Avatars are objects under `<user id>/` in the public avatar
//! bucket; the profile only keeps the public URL.

use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ProviderError;
use crate::retry::{RetryPolicy, Sleep};

#[cfg(test)]
#[path = "profiles_test.rs"]
mod profiles_test;

/// Largest accepted avatar upload, in bytes.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Accepted avatar file extensions (lowercase).
pub const AVATAR_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Profile {
    /// Empty profile for an identity that has no row yet.
    #[must_use]
    pub fn blank(user_id: &str) -> Self {
        Self { id: user_id.to_owned(), ..Self::default() }
    }
}

/// Row written once at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Could not load the profile. Please refresh the page.")]
    LoadFailed,

    #[error("Could not save the profile. Please try again.")]
    SaveFailed,

    #[error("The image must not exceed 5 MB.")]
    AvatarTooLarge,

    #[error("Unsupported image format. Use JPG, PNG or GIF.")]
    UnsupportedAvatarFormat,

    #[error("Could not upload the avatar. Please try again.")]
    AvatarUploadFailed,
}

// =============================================================================
// STORE TRAITS
// =============================================================================

#[async_trait(?Send)]
pub trait ProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, ProviderError>;

    async fn username_exists(&self, username: &str) -> Result<bool, ProviderError>;

    async fn insert(&self, profile: &NewProfile) -> Result<(), ProviderError>;

    async fn upsert(&self, profile: &Profile) -> Result<(), ProviderError>;
}

/// Object storage for avatar images.
#[async_trait(?Send)]
pub trait AvatarStore {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), ProviderError>;

    async fn remove(&self, path: &str) -> Result<(), ProviderError>;

    fn public_url(&self, path: &str) -> String;
}

// =============================================================================
// AVATAR VALIDATION
// =============================================================================

/// Check size and extension of a candidate avatar and return its normalized
/// (lowercase) extension.
///
/// # Errors
///
/// Returns `AvatarTooLarge` above [`MAX_AVATAR_BYTES`] and
/// `UnsupportedAvatarFormat` for any other extension than
/// [`AVATAR_EXTENSIONS`].
pub fn validate_avatar(file_name: &str, size: usize) -> Result<String, ProfileError> {
    if size > MAX_AVATAR_BYTES {
        return Err(ProfileError::AvatarTooLarge);
    }
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(ProfileError::UnsupportedAvatarFormat)?;
    if AVATAR_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ProfileError::UnsupportedAvatarFormat)
    }
}

/// Fresh object path for a new avatar: `<user id>/<uuid>.<ext>`.
#[must_use]
pub fn avatar_object_path(user_id: &str, ext: &str) -> String {
    format!("{user_id}/{}.{ext}", Uuid::new_v4())
}

/// Object path of the avatar a public URL points at, if it is one of ours.
#[must_use]
pub fn avatar_path_from_url(user_id: &str, url: &str) -> Option<String> {
    let name = url.rsplit('/').next().filter(|name| !name.is_empty())?;
    Some(format!("{user_id}/{name}"))
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct ProfileService {
    repo: Rc<dyn ProfileRepository>,
    avatars: Rc<dyn AvatarStore>,
    retry: RetryPolicy,
    sleep: Sleep,
}

impl ProfileService {
    #[must_use]
    pub fn new(repo: Rc<dyn ProfileRepository>, avatars: Rc<dyn AvatarStore>, retry: RetryPolicy, sleep: Sleep) -> Self {
        Self { repo, avatars, retry, sleep }
    }

    /// Load a profile, retrying transient failures. An identity without a
    /// row gets a blank profile so the form can create it.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailed` once the retry budget is spent.
    pub async fn load(&self, user_id: &str) -> Result<Profile, ProfileError> {
        let sleep = &self.sleep;
        let found = self
            .retry
            .run("profile", || self.repo.find(user_id), |delay| sleep(delay))
            .await
            .map_err(|e| {
                warn!(%user_id, error = %e, "profile load failed");
                ProfileError::LoadFailed
            })?;
        Ok(found.unwrap_or_else(|| Profile::blank(user_id)))
    }

    /// Whether the identity has a profile row. Lookup failures count as no.
    pub async fn has_profile(&self, user_id: &str) -> bool {
        match self.repo.find(user_id).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(%user_id, error = %e, "profile check failed");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SaveFailed` when the store rejects the write.
    pub async fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        self.repo.upsert(profile).await.map_err(|e| {
            warn!(user_id = %profile.id, error = %e, "profile save failed");
            ProfileError::SaveFailed
        })?;
        info!(user_id = %profile.id, "profile saved");
        Ok(())
    }

    /// Upload a new avatar and return the profile pointing at it. The
    /// previous object is removed first, best-effort. The returned profile
    /// is not saved.
    ///
    /// # Errors
    ///
    /// Returns a validation error for oversized or unsupported files and
    /// `AvatarUploadFailed` when the upload itself fails.
    pub async fn change_avatar(&self, profile: &Profile, file_name: &str, bytes: Vec<u8>) -> Result<Profile, ProfileError> {
        let ext = validate_avatar(file_name, bytes.len())?;
        let path = avatar_object_path(&profile.id, &ext);

        if let Some(old) = profile.avatar_url.as_deref().and_then(|url| avatar_path_from_url(&profile.id, url)) {
            if let Err(e) = self.avatars.remove(&old).await {
                warn!(path = %old, error = %e, "previous avatar removal failed");
            }
        }

        self.avatars
            .upload(&path, content_type_for(&ext), bytes)
            .await
            .map_err(|e| {
                warn!(%path, error = %e, "avatar upload failed");
                ProfileError::AvatarUploadFailed
            })?;

        info!(user_id = %profile.id, %path, "avatar uploaded");
        Ok(Profile { avatar_url: Some(self.avatars.public_url(&path)), ..profile.clone() })
    }
}

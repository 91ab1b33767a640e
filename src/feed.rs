//! Post feed: listing, publishing, editing and likes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every mutation is scoped to the acting user's own rows by filter (the
//! data store enforces the same rule through row-level security). After a
//! publish or a like toggle the whole list is reloaded so like counts reflect
//! what the store confirmed.

use std::rc::Rc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::profiles::ProfileRepository;
use crate::retry::{RetryPolicy, Sleep};

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

/// Character budget shown next to the composer.
pub const MAX_POST_CHARS: usize = 280;

static LINK_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"https?://\S+").ok());

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub user_id: String,
    #[serde(rename = "profiles", default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

impl Post {
    #[must_use]
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    #[must_use]
    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    #[must_use]
    pub fn is_own(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.username.as_str())
    }

    /// Uppercased first letter of the author name, for avatar placeholders.
    #[must_use]
    pub fn author_initial(&self) -> String {
        self.author_name().chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("Could not load posts. Please refresh the page.")]
    LoadFailed,

    #[error("A post cannot be empty.")]
    EmptyContent,

    #[error("Please complete your profile before posting.")]
    ProfileRequired,

    #[error("Could not publish the post. Please try again.")]
    PublishFailed,

    #[error("Could not edit the post. Please try again.")]
    UpdateFailed,

    #[error("Could not delete the post. Please try again.")]
    DeleteFailed,

    #[error("Could not update the like. Please try again.")]
    LikeFailed,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

#[async_trait(?Send)]
pub trait PostRepository {
    /// All posts, newest first, with author and likes embedded.
    async fn list(&self) -> Result<Vec<Post>, ProviderError>;

    async fn insert(&self, user_id: &str, content: &str) -> Result<(), ProviderError>;

    async fn update(&self, post_id: &str, user_id: &str, content: &str) -> Result<(), ProviderError>;

    async fn delete(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError>;

    async fn like(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError>;

    async fn unlike(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError>;
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct FeedService {
    posts: Rc<dyn PostRepository>,
    profiles: Rc<dyn ProfileRepository>,
    retry: RetryPolicy,
    sleep: Sleep,
}

impl FeedService {
    #[must_use]
    pub fn new(posts: Rc<dyn PostRepository>, profiles: Rc<dyn ProfileRepository>, retry: RetryPolicy, sleep: Sleep) -> Self {
        Self { posts, profiles, retry, sleep }
    }

    /// # Errors
    ///
    /// Returns `LoadFailed` once the retry budget is spent.
    pub async fn load(&self) -> Result<Vec<Post>, FeedError> {
        let sleep = &self.sleep;
        self.retry
            .run("posts", || self.posts.list(), |delay| sleep(delay))
            .await
            .map_err(|e| {
                warn!(error = %e, "post list failed");
                FeedError::LoadFailed
            })
    }

    /// Publish a post and return the reloaded feed.
    ///
    /// # Errors
    ///
    /// Returns `EmptyContent` for blank text, `ProfileRequired` when the
    /// author has no profile row, `PublishFailed` when the insert fails, and
    /// `LoadFailed` when the reload fails.
    pub async fn create_post(&self, user_id: &str, content: &str) -> Result<Vec<Post>, FeedError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::EmptyContent);
        }
        match self.profiles.find(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(FeedError::ProfileRequired),
            Err(e) => {
                warn!(%user_id, error = %e, "profile check before publish failed");
                return Err(FeedError::ProfileRequired);
            }
        }
        self.posts.insert(user_id, content).await.map_err(|e| {
            warn!(%user_id, error = %e, "post insert failed");
            FeedError::PublishFailed
        })?;
        info!(%user_id, "post published");
        self.load().await
    }

    /// Replace the text of one of the user's own posts. Returns the stored
    /// (trimmed) text.
    ///
    /// # Errors
    ///
    /// Returns `EmptyContent` for blank text and `UpdateFailed` when the
    /// store rejects the change.
    pub async fn update_post(&self, post_id: &str, user_id: &str, content: &str) -> Result<String, FeedError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::EmptyContent);
        }
        self.posts.update(post_id, user_id, content).await.map_err(|e| {
            warn!(%post_id, error = %e, "post update failed");
            FeedError::UpdateFailed
        })?;
        Ok(content.to_owned())
    }

    /// # Errors
    ///
    /// Returns `DeleteFailed` when the store rejects the delete.
    pub async fn delete_post(&self, post_id: &str, user_id: &str) -> Result<(), FeedError> {
        self.posts.delete(post_id, user_id).await.map_err(|e| {
            warn!(%post_id, error = %e, "post delete failed");
            FeedError::DeleteFailed
        })?;
        info!(%post_id, "post deleted");
        Ok(())
    }

    /// Like or unlike depending on whether `user_id` already likes the post
    /// in `current`, then reload.
    ///
    /// # Errors
    ///
    /// Returns `LikeFailed` when the write fails and `LoadFailed` when the
    /// reload fails.
    pub async fn toggle_like(&self, current: &[Post], post_id: &str, user_id: &str) -> Result<Vec<Post>, FeedError> {
        let liked = current.iter().find(|p| p.id == post_id).is_some_and(|p| p.liked_by(user_id));
        let outcome = if liked {
            self.posts.unlike(post_id, user_id).await
        } else {
            self.posts.like(post_id, user_id).await
        };
        outcome.map_err(|e| {
            warn!(%post_id, liked, error = %e, "like toggle failed");
            FeedError::LikeFailed
        })?;
        self.load().await
    }
}

/// Remove a post from a list without reloading.
pub fn remove_post(posts: &mut Vec<Post>, post_id: &str) {
    posts.retain(|p| p.id != post_id);
}

/// Replace the text of a post in a list without reloading.
pub fn replace_content(posts: &mut [Post], post_id: &str, content: &str) {
    if let Some(post) = posts.iter_mut().find(|p| p.id == post_id) {
        content.clone_into(&mut post.content);
    }
}

/// Characters left in the composer budget. Negative when over.
#[must_use]
pub fn remaining_chars(content: &str) -> i64 {
    let used = i64::try_from(content.chars().count()).unwrap_or(i64::MAX);
    i64::try_from(MAX_POST_CHARS).unwrap_or(i64::MAX) - used
}

// =============================================================================
// RENDERING HELPERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link(&'a str),
}

/// Split post text into plain runs and `http(s)://` links.
#[must_use]
pub fn link_segments(content: &str) -> Vec<Segment<'_>> {
    let Some(re) = LINK_RE.as_ref() else {
        return vec![Segment::Text(content)];
    };
    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(content) {
        if m.start() > last {
            segments.push(Segment::Text(&content[last..m.start()]));
        }
        segments.push(Segment::Link(m.as_str()));
        last = m.end();
    }
    if last < content.len() {
        segments.push(Segment::Text(&content[last..]));
    }
    segments
}

/// Short relative age of a post, e.g. `"5 minutes ago"`. `None` when the
/// timestamp does not parse.
#[must_use]
pub fn age_label(created_at: &str, now: OffsetDateTime) -> Option<String> {
    let created = OffsetDateTime::parse(created_at, &Rfc3339).ok()?;
    let secs = (now - created).whole_seconds().max(0);
    let (n, unit) = match secs {
        0..60 => return Some("just now".to_owned()),
        60..3_600 => (secs / 60, "minute"),
        3_600..86_400 => (secs / 3_600, "hour"),
        86_400..2_592_000 => (secs / 86_400, "day"),
        2_592_000..31_536_000 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if n == 1 { "" } else { "s" };
    Some(format!("{n} {unit}{plural} ago"))
}

//! Scripted fakes shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::{ProviderError, StorageError};
use crate::feed::{Author, Like, Post, PostRepository};
use crate::identity::{Identity, IdentityAdmin, IdentityProvider, ListenerRegistry, Session, SessionCallback, Subscription};
use crate::profiles::{AvatarStore, NewProfile, Profile, ProfileRepository};
use crate::retry::Sleep;
use crate::storage::KeyValueStore;

type LookupResult = Result<Option<Session>, ProviderError>;

/// Install a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Timer that resolves immediately.
#[must_use]
pub fn no_sleep() -> Sleep {
    Rc::new(|_: Duration| -> Pin<Box<dyn Future<Output = ()>>> { Box::pin(async {}) })
}

#[must_use]
pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("mayfly-{}.json", Uuid::new_v4()))
}

// =============================================================================
// IDENTITY PROVIDER
// =============================================================================

enum Lookup {
    Pending(oneshot::Receiver<LookupResult>),
    Ready(LookupResult),
}

/// Identity provider whose every outcome is set by the test.
///
/// Successful sign-in and sign-up notify a session for `user-<email>`;
/// successful sign-out notifies `None`. Failures notify nothing.
#[derive(Default)]
pub struct FakeProvider {
    listeners: ListenerRegistry,
    lookup: RefCell<Option<Lookup>>,
    sign_in_error: RefCell<Option<ProviderError>>,
    sign_up_error: RefCell<Option<ProviderError>>,
    sign_up_without_identity: Cell<bool>,
    sign_out_error: RefCell<Option<ProviderError>>,
    calls: RefCell<Vec<String>>,
    notifications: Cell<usize>,
}

impl FakeProvider {
    /// Provider whose initial lookup resolves only when the test sends.
    #[must_use]
    pub fn pending() -> (Rc<Self>, oneshot::Sender<LookupResult>) {
        let (tx, rx) = oneshot::channel();
        let provider = Self { lookup: RefCell::new(Some(Lookup::Pending(rx))), ..Self::default() };
        (Rc::new(provider), tx)
    }

    #[must_use]
    pub fn resolved(result: LookupResult) -> Rc<Self> {
        Rc::new(Self { lookup: RefCell::new(Some(Lookup::Ready(result))), ..Self::default() })
    }

    /// Push a session change to every subscriber.
    pub fn emit(&self, session: Option<Session>) {
        self.notifications.set(self.notifications.get() + 1);
        self.listeners.notify(session.as_ref());
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.get()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn fail_sign_in(&self, err: ProviderError) {
        *self.sign_in_error.borrow_mut() = Some(err);
    }

    pub fn fail_sign_up(&self, err: ProviderError) {
        *self.sign_up_error.borrow_mut() = Some(err);
    }

    pub fn sign_up_returns_no_identity(&self) {
        self.sign_up_without_identity.set(true);
    }

    pub fn fail_sign_out(&self, err: ProviderError) {
        *self.sign_out_error.borrow_mut() = Some(err);
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn identity_for(email: &str) -> Identity {
    Identity { id: format!("user-{email}"), email: Some(email.to_owned()) }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError> {
        self.record("get_current_session".into());
        let lookup = self.lookup.borrow_mut().take();
        match lookup {
            Some(Lookup::Pending(rx)) => rx.await.unwrap_or_else(|_| Err(ProviderError::Transport("lookup abandoned".into()))),
            Some(Lookup::Ready(result)) => result,
            None => Ok(None),
        }
    }

    fn subscribe(&self, callback: SessionCallback) -> Subscription {
        self.listeners.register(callback)
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<(), ProviderError> {
        self.record(format!("sign_in:{email}"));
        if let Some(err) = self.sign_in_error.borrow_mut().take() {
            return Err(err);
        }
        self.emit(Some(Session { user: identity_for(email) }));
        Ok(())
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<Option<Identity>, ProviderError> {
        self.record(format!("sign_up:{email}"));
        if let Some(err) = self.sign_up_error.borrow_mut().take() {
            return Err(err);
        }
        if self.sign_up_without_identity.get() {
            return Ok(None);
        }
        let identity = identity_for(email);
        self.emit(Some(Session { user: identity.clone() }));
        Ok(Some(identity))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.record("sign_out".into());
        if let Some(err) = self.sign_out_error.borrow_mut().take() {
            return Err(err);
        }
        self.emit(None);
        Ok(())
    }
}

// =============================================================================
// ADMIN
// =============================================================================

#[derive(Default)]
pub struct FakeAdmin {
    deleted: RefCell<Vec<String>>,
    fail: Cell<bool>,
}

impl FakeAdmin {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn failing() -> Rc<Self> {
        let admin = Self::default();
        admin.fail.set(true);
        Rc::new(admin)
    }

    /// Ids passed to `delete_user`, including failed attempts.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }
}

#[async_trait(?Send)]
impl IdentityAdmin for FakeAdmin {
    async fn delete_user(&self, user_id: &str) -> Result<(), ProviderError> {
        self.deleted.borrow_mut().push(user_id.to_owned());
        if self.fail.get() {
            return Err(ProviderError::from_status(403, "not allowed".into()));
        }
        Ok(())
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Store whose every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }
}

// =============================================================================
// REPOSITORIES
// =============================================================================

fn unavailable() -> ProviderError {
    ProviderError::from_status(503, "down".into())
}

/// In-memory profile table with failure injection.
#[derive(Default)]
pub struct MemoryProfiles {
    rows: RefCell<BTreeMap<String, Profile>>,
    find_failures: Cell<u32>,
    find_calls: Cell<u32>,
    fail_username_check: Cell<bool>,
    fail_insert: Cell<bool>,
    fail_upsert: Cell<bool>,
}

impl MemoryProfiles {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn seed(&self, id: &str, username: &str) {
        let profile = Profile { id: id.to_owned(), username: username.to_owned(), ..Profile::default() };
        self.rows.borrow_mut().insert(id.to_owned(), profile);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Profile> {
        self.rows.borrow().get(id).cloned()
    }

    /// Fail the next `n` lookups with a transient error.
    pub fn fail_next_finds(&self, n: u32) {
        self.find_failures.set(n);
    }

    #[must_use]
    pub fn find_calls(&self) -> u32 {
        self.find_calls.get()
    }

    pub fn fail_username_check(&self) {
        self.fail_username_check.set(true);
    }

    pub fn fail_insert(&self) {
        self.fail_insert.set(true);
    }

    pub fn fail_upsert(&self) {
        self.fail_upsert.set(true);
    }
}

#[async_trait(?Send)]
impl ProfileRepository for MemoryProfiles {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, ProviderError> {
        self.find_calls.set(self.find_calls.get() + 1);
        if self.find_failures.get() > 0 {
            self.find_failures.set(self.find_failures.get() - 1);
            return Err(ProviderError::Transport("offline".into()));
        }
        Ok(self.get(user_id))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, ProviderError> {
        if self.fail_username_check.get() {
            return Err(unavailable());
        }
        Ok(self.rows.borrow().values().any(|p| p.username == username))
    }

    async fn insert(&self, profile: &NewProfile) -> Result<(), ProviderError> {
        if self.fail_insert.get() {
            return Err(ProviderError::from_status(409, "duplicate key".into()));
        }
        self.seed(&profile.id, &profile.username);
        Ok(())
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), ProviderError> {
        if self.fail_upsert.get() {
            return Err(unavailable());
        }
        self.rows.borrow_mut().insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

/// In-memory post and like tables. Authors are resolved from the attached
/// profile table at listing time.
pub struct MemoryPosts {
    profiles: Rc<MemoryProfiles>,
    rows: RefCell<Vec<Post>>,
    clock: Cell<u32>,
    list_failures: Cell<u32>,
    list_calls: Cell<u32>,
    fail_writes: Cell<bool>,
}

impl MemoryPosts {
    #[must_use]
    pub fn new(profiles: Rc<MemoryProfiles>) -> Rc<Self> {
        Rc::new(Self {
            profiles,
            rows: RefCell::new(Vec::new()),
            clock: Cell::new(0),
            list_failures: Cell::new(0),
            list_calls: Cell::new(0),
            fail_writes: Cell::new(false),
        })
    }

    /// Insert a post directly and return its id.
    pub fn seed(&self, user_id: &str, content: &str) -> String {
        let tick = self.clock.get() + 1;
        self.clock.set(tick);
        let id = format!("post-{tick}");
        self.rows.borrow_mut().push(Post {
            id: id.clone(),
            content: content.to_owned(),
            created_at: format!("2024-01-01T00:{:02}:{:02}Z", tick / 60, tick % 60),
            user_id: user_id.to_owned(),
            author: None,
            likes: Vec::new(),
        });
        id
    }

    #[must_use]
    pub fn stored(&self, post_id: &str) -> Option<Post> {
        self.rows.borrow().iter().find(|p| p.id == post_id).cloned()
    }

    pub fn fail_next_lists(&self, n: u32) {
        self.list_failures.set(n);
    }

    #[must_use]
    pub fn list_calls(&self) -> u32 {
        self.list_calls.get()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    fn check_write(&self) -> Result<(), ProviderError> {
        if self.fail_writes.get() { Err(unavailable()) } else { Ok(()) }
    }
}

#[async_trait(?Send)]
impl PostRepository for MemoryPosts {
    async fn list(&self) -> Result<Vec<Post>, ProviderError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.list_failures.get() > 0 {
            self.list_failures.set(self.list_failures.get() - 1);
            return Err(ProviderError::Transport("offline".into()));
        }
        let mut posts = self.rows.borrow().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for post in &mut posts {
            post.author = self
                .profiles
                .get(&post.user_id)
                .map(|p| Author { username: p.username, avatar_url: p.avatar_url });
        }
        Ok(posts)
    }

    async fn insert(&self, user_id: &str, content: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.seed(user_id, content);
        Ok(())
    }

    async fn update(&self, post_id: &str, user_id: &str, content: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        for post in self.rows.borrow_mut().iter_mut() {
            if post.id == post_id && post.user_id == user_id {
                content.clone_into(&mut post.content);
            }
        }
        Ok(())
    }

    async fn delete(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        self.rows.borrow_mut().retain(|p| !(p.id == post_id && p.user_id == user_id));
        Ok(())
    }

    async fn like(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        if let Some(post) = self.rows.borrow_mut().iter_mut().find(|p| p.id == post_id) {
            post.likes.push(Like { id: Uuid::new_v4().to_string(), user_id: user_id.to_owned() });
        }
        Ok(())
    }

    async fn unlike(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        self.check_write()?;
        if let Some(post) = self.rows.borrow_mut().iter_mut().find(|p| p.id == post_id) {
            post.likes.retain(|like| like.user_id != user_id);
        }
        Ok(())
    }
}

/// Avatar bucket that records uploads and removals.
#[derive(Default)]
pub struct MemoryAvatars {
    uploaded: RefCell<Vec<(String, String)>>,
    removed: RefCell<Vec<String>>,
    fail_upload: Cell<bool>,
    fail_remove: Cell<bool>,
}

impl MemoryAvatars {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// `(path, content type)` of every successful upload.
    #[must_use]
    pub fn uploaded(&self) -> Vec<(String, String)> {
        self.uploaded.borrow().clone()
    }

    #[must_use]
    pub fn removed(&self) -> Vec<String> {
        self.removed.borrow().clone()
    }

    pub fn fail_upload(&self) {
        self.fail_upload.set(true);
    }

    pub fn fail_remove(&self) {
        self.fail_remove.set(true);
    }
}

#[async_trait(?Send)]
impl AvatarStore for MemoryAvatars {
    async fn upload(&self, path: &str, content_type: &str, _bytes: Vec<u8>) -> Result<(), ProviderError> {
        if self.fail_upload.get() {
            return Err(unavailable());
        }
        self.uploaded.borrow_mut().push((path.to_owned(), content_type.to_owned()));
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), ProviderError> {
        self.removed.borrow_mut().push(path.to_owned());
        if self.fail_remove.get() {
            return Err(unavailable());
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/avatars/{path}")
    }
}

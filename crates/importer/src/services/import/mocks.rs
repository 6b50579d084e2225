//! Mock implementations for testing ImportService.
//!
//! All mocks share their state through `Arc<Mutex<..>>`, so a clone handed
//! to the service can still be inspected by the test afterwards.

use async_trait::async_trait;
use chrono::Utc;
use domain::{
    DerivedMeta, DomainError, DomainResult, Media, MediaCollection, MetaKey, MetaValue, Post,
    PostRepository,
};
use github::{GithubError, Repository};
use packagist::{Package, PackagistError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Notification;
use crate::services::event::EventPublisher;
use crate::services::media::{MediaError, MediaStore};
use crate::services::remote::{FetchError, RemoteSource};

/// A transport-level reqwest error, built without touching the network.
fn request_error() -> reqwest::Error {
    reqwest::Client::new().get("not a url").build().unwrap_err()
}

// ============================================================================
// Mock Post Repository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockPostRepository {
    posts: Arc<Mutex<HashMap<i64, Post>>>,
    meta: Arc<Mutex<HashMap<(i64, MetaKey), MetaValue>>>,
    next_id: Arc<Mutex<i64>>,
    saves: Arc<Mutex<usize>>,
    slug_miss_winner: Arc<Mutex<Option<Post>>>,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a post directly, bypassing the save counter. Returns its id.
    pub fn insert(&self, mut post: Post) -> i64 {
        if post.is_new() {
            post.id = self.allocate_id();
        }
        let id = post.id;
        self.posts.lock().unwrap().insert(id, post);
        id
    }

    pub fn get(&self, id: i64) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    pub fn all(&self) -> Vec<Post> {
        self.posts.lock().unwrap().values().cloned().collect()
    }

    pub fn meta(&self, post_id: i64, key: MetaKey) -> Option<MetaValue> {
        self.meta.lock().unwrap().get(&(post_id, key)).cloned()
    }

    /// Store `post` right after the next slug lookup that finds nothing,
    /// as if another worker inserted it in between.
    pub fn insert_on_slug_miss(&self, post: Post) {
        *self.slug_miss_winner.lock().unwrap() = Some(post);
    }

    /// Number of `save` calls that reached the repository
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn with_meta(&self, mut post: Post) -> Post {
        let meta = self.meta.lock().unwrap();
        post.derived_meta = meta
            .iter()
            .filter(|((id, _), _)| *id == post.id)
            .map(|((_, key), value)| (*key, value.clone()))
            .collect();
        post
    }
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Post>> {
        Ok(self.get(id).map(|p| self.with_meta(p)))
    }

    async fn find_by_slug_with_trashed(&self, slug: &str) -> DomainResult<Option<Post>> {
        let found = self
            .posts
            .lock()
            .unwrap()
            .values()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned();

        if found.is_none() {
            let winner = self.slug_miss_winner.lock().unwrap().take();
            if let Some(winner) = winner {
                self.insert(winner);
            }
        }

        Ok(found.map(|p| self.with_meta(p)))
    }

    async fn find_refreshable(&self, post_type: &str) -> DomainResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.post_type == post_type && p.is_refreshable())
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.id);
        Ok(posts.into_iter().map(|p| self.with_meta(p)).collect())
    }

    async fn save(&self, post: &mut Post) -> DomainResult<()> {
        *self.saves.lock().unwrap() += 1;

        if let Some(slug) = post.slug.as_deref() {
            let taken = self
                .posts
                .lock()
                .unwrap()
                .values()
                .any(|p| p.id != post.id && p.slug.as_deref() == Some(slug));
            if taken {
                return Err(DomainError::Conflict(format!(
                    "UNIQUE constraint failed: post.slug ({})",
                    slug
                )));
            }
        }

        if post.is_new() {
            post.id = self.allocate_id();
        } else if !self.posts.lock().unwrap().contains_key(&post.id) {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post.id.to_string(),
            });
        }

        post.updated_at = Utc::now();
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(())
    }

    async fn restore(&self, post: &mut Post) -> DomainResult<()> {
        let mut posts = self.posts.lock().unwrap();
        let stored = posts.get_mut(&post.id).ok_or_else(|| DomainError::NotFound {
            entity_type: "post",
            id: post.id.to_string(),
        })?;
        stored.restore();
        post.restore();
        Ok(())
    }

    async fn save_meta(&self, post_id: i64, meta: &DerivedMeta) -> DomainResult<()> {
        let mut stored = self.meta.lock().unwrap();
        for (key, value) in meta.iter() {
            stored.insert((post_id, key), value.clone());
        }
        Ok(())
    }

    async fn get_meta(&self, post_id: i64, key: MetaKey) -> DomainResult<Option<MetaValue>> {
        Ok(self.meta(post_id, key))
    }
}

// ============================================================================
// Mock Remote Source
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRemoteSource {
    repositories: Arc<Mutex<HashMap<String, Value>>>,
    readmes: Arc<Mutex<HashMap<(String, String), String>>>,
    packages: Arc<Mutex<HashMap<String, Value>>>,
    fail_repositories: Arc<Mutex<bool>>,
    fail_packages: Arc<Mutex<bool>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRemoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_repository(&self, identifier: &str, payload: Value) {
        self.repositories
            .lock()
            .unwrap()
            .insert(identifier.to_string(), payload);
    }

    pub fn set_readme(&self, identifier: &str, branch: &str, readme: &str) {
        self.readmes.lock().unwrap().insert(
            (identifier.to_string(), branch.to_string()),
            readme.to_string(),
        );
    }

    pub fn set_package(&self, full_name: &str, payload: Value) {
        self.packages
            .lock()
            .unwrap()
            .insert(full_name.to_string(), payload);
    }

    /// Make every metadata fetch fail with a transport error
    pub fn fail_repositories(&self) {
        *self.fail_repositories.lock().unwrap() = true;
    }

    /// Make every Packagist fetch fail with a transport error
    pub fn fail_packages(&self) {
        *self.fail_packages.lock().unwrap() = true;
    }

    /// Recorded fetches, e.g. `repo:acme/widget` or `readme:acme/widget@main`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn repository_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("repo:"))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch_repository(&self, identifier: &str) -> Result<Option<Repository>, FetchError> {
        self.record(format!("repo:{}", identifier));
        if *self.fail_repositories.lock().unwrap() {
            return Err(GithubError::Request(request_error()).into());
        }
        Ok(self
            .repositories
            .lock()
            .unwrap()
            .get(identifier)
            .cloned()
            .map(Repository::from_value))
    }

    async fn fetch_readme(&self, identifier: &str, branch: &str) -> Result<Option<String>, FetchError> {
        self.record(format!("readme:{}@{}", identifier, branch));
        Ok(self
            .readmes
            .lock()
            .unwrap()
            .get(&(identifier.to_string(), branch.to_string()))
            .cloned())
    }

    async fn fetch_package(&self, full_name: &str) -> Result<Option<Package>, FetchError> {
        self.record(format!("package:{}", full_name));
        if *self.fail_packages.lock().unwrap() {
            return Err(PackagistError::Request(request_error()).into());
        }
        Ok(self
            .packages
            .lock()
            .unwrap()
            .get(full_name)
            .cloned()
            .map(Package::from_value))
    }
}

// ============================================================================
// Mock Media Store
// ============================================================================

#[derive(Clone, Default)]
pub struct MockMediaStore {
    attached: Arc<Mutex<Vec<(i64, String)>>>,
    cleared: Arc<Mutex<Vec<i64>>>,
    fail_attach: Arc<Mutex<bool>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_attach(&self) {
        *self.fail_attach.lock().unwrap() = true;
    }

    /// `(post_id, url)` of every successful attach
    pub fn attached(&self) -> Vec<(i64, String)> {
        self.attached.lock().unwrap().clone()
    }

    /// Post ids whose feature image was cleared
    pub fn cleared(&self) -> Vec<i64> {
        self.cleared.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn attach_from_url(
        &self,
        post_id: i64,
        collection: MediaCollection,
        url: &str,
    ) -> Result<Media, MediaError> {
        if *self.fail_attach.lock().unwrap() {
            return Err(MediaError::EmptyBody(url.to_string()));
        }
        self.attached
            .lock()
            .unwrap()
            .push((post_id, url.to_string()));
        Ok(Media {
            post_id,
            collection,
            file_path: format!("posts/{}/{}.jpg", post_id, collection),
            source_url: url.to_string(),
            content_type: Some("image/jpeg".to_string()),
            created_at: Utc::now(),
        })
    }

    async fn clear(&self, post_id: i64, _collection: MediaCollection) -> Result<(), MediaError> {
        self.cleared.lock().unwrap().push(post_id);
        Ok(())
    }
}

// ============================================================================
// Recording Publisher
// ============================================================================

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    created: Arc<Mutex<Vec<Post>>>,
    updated: Arc<Mutex<Vec<Post>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<Post> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<Post> {
        self.updated.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn post_created(&self, post: &Post) {
        self.created.lock().unwrap().push(post.clone());
    }

    async fn post_updated(&self, post: &Post) {
        self.updated.lock().unwrap().push(post.clone());
    }

    async fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

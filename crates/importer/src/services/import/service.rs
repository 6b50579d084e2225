//! Import service implementation.

use domain::{DomainError, MediaCollection, Post, PostRepository, OPEN_SOURCE_TYPE};
use futures::stream::{self, StreamExt};
use packagist::Package;
use std::sync::Arc;

use crate::models::ImportSettings;
use crate::services::event::EventPublisher;
use crate::services::identifier::extract_repo_identifier;
use crate::services::media::MediaStore;
use crate::services::remote::RemoteSource;

use super::locks::SlugLocks;
use super::mapping::{derive_meta, map_github_data, DEFAULT_BRANCH};
use super::reconcile::slug_for;
use super::types::{ImportError, ImportRequest, Provenance, RefreshStats, RemoteData};

/// Service importing GitHub repositories as posts and refreshing them.
pub struct ImportService {
    pub(super) posts: Arc<dyn PostRepository>,
    pub(super) source: Arc<dyn RemoteSource>,
    pub(super) media: Arc<dyn MediaStore>,
    pub(super) events: Arc<dyn EventPublisher>,
    locales: Vec<String>,
    refresh_concurrency: usize,
    locks: SlugLocks,
}

impl ImportService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        source: Arc<dyn RemoteSource>,
        media: Arc<dyn MediaStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let defaults = ImportSettings::default();
        Self {
            posts,
            source,
            media,
            events,
            locales: defaults.locales,
            refresh_concurrency: defaults.refresh_concurrency,
            locks: SlugLocks::new(),
        }
    }

    /// Apply locale and concurrency settings
    pub fn with_settings(mut self, settings: &ImportSettings) -> Self {
        self.locales = settings.locales.clone();
        self.refresh_concurrency = settings.refresh_concurrency.max(1);
        self
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Import the repository behind `request.url`.
    ///
    /// Returns `Ok(None)` when the repository metadata or its README is not
    /// available; nothing is written in that case.
    pub async fn import_repository(&self, request: ImportRequest) -> Result<Option<Post>, ImportError> {
        let identifier = extract_repo_identifier(&request.url);
        tracing::info!("Importing repository {}", identifier);

        let Some(data) = self.fetch_remote(&identifier).await? else {
            tracing::info!("Repository {} is not importable", identifier);
            return Ok(None);
        };

        let slug = slug_for(&data.repository)?.to_string();
        let provenance = Provenance::from(&request);

        let post = {
            let _guard = self.locks.lock(&slug).await;

            match self.write_post(&data, &provenance).await {
                Err(ImportError::Domain(DomainError::Conflict(reason))) => {
                    // Another process inserted the slug after our lookup
                    tracing::info!("Slug '{}' taken concurrently ({}), reconciling again", slug, reason);
                    self.write_post(&data, &provenance).await?
                }
                result => result?,
            }
        };

        if let Some(avatar_url) = data.repository.owner_avatar_url() {
            self.set_feature_image(&post, avatar_url).await;
        }

        tracing::info!("Imported {} as post {} ('{}')", identifier, post.id, slug);
        Ok(Some(post))
    }

    /// Re-fetch an imported post from its source URL.
    ///
    /// Identity, slug and source URL are kept. Returns `Ok(false)` when the
    /// post has no source URL or the remote data is unavailable.
    pub async fn refresh_post(&self, post: &mut Post) -> Result<bool, ImportError> {
        let Some(url) = post.source_url().map(str::to_string) else {
            tracing::debug!("Post {} has no source URL, nothing to refresh", post.id);
            return Ok(false);
        };

        let identifier = extract_repo_identifier(&url);
        let Some(data) = self.fetch_remote(&identifier).await? else {
            tracing::debug!("Source of post {} ({}) is unavailable", post.id, identifier);
            return Ok(false);
        };

        let _guard = match post.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(slug) => Some(self.locks.lock(slug).await),
            None => None,
        };

        // The caller's copy may predate an import or a trash that ran meanwhile
        match self.posts.find_by_id(post.id).await? {
            Some(current) if !current.is_trashed() => *post = current,
            _ => {
                tracing::debug!("Post {} was removed before its refresh", post.id);
                return Ok(false);
            }
        }

        self.apply_github_data(post, &data, &Provenance::default()).await?;
        self.apply_derived_meta(post, &data).await?;

        tracing::debug!("Refreshed post {} from {}", post.id, identifier);
        Ok(true)
    }

    /// Refresh every live `open-source` post that has a source URL.
    ///
    /// One failing post never stops the others. Each success is published
    /// as a post update.
    pub async fn refresh_all(&self) -> Result<RefreshStats, ImportError> {
        let posts = self.posts.find_refreshable(OPEN_SOURCE_TYPE).await?;
        let mut stats = RefreshStats {
            attempted: posts.len(),
            ..Default::default()
        };

        tracing::info!("Refreshing {} imported posts", stats.attempted);

        let mut results = stream::iter(posts)
            .map(|mut post| async move {
                let result = self.refresh_post(&mut post).await;
                (post, result)
            })
            .buffer_unordered(self.refresh_concurrency);

        while let Some((post, result)) = results.next().await {
            match result {
                Ok(true) => {
                    stats.succeeded += 1;
                    self.events.post_updated(&post).await;
                }
                Ok(false) => stats.skipped += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("Failed to refresh post {}: {}", post.id, e);
                }
            }
        }

        tracing::info!("Refresh finished: {}", stats);
        Ok(stats)
    }

    /// Reconcile, map and persist in one go. Runs under the slug lock.
    async fn write_post(&self, data: &RemoteData, provenance: &Provenance) -> Result<Post, ImportError> {
        let mut post = self.find_or_create(&data.repository).await?;
        self.apply_github_data(&mut post, data, provenance).await?;
        self.apply_derived_meta(&mut post, data).await?;
        Ok(post)
    }

    /// Map the fetched data onto `post` and persist it.
    pub async fn apply_github_data(
        &self,
        post: &mut Post,
        data: &RemoteData,
        provenance: &Provenance,
    ) -> Result<(), ImportError> {
        map_github_data(post, data, provenance, &self.locales)?;
        self.posts.save(post).await?;
        Ok(())
    }

    /// Persist the derived metadata of a saved post.
    pub async fn apply_derived_meta(&self, post: &mut Post, data: &RemoteData) -> Result<(), ImportError> {
        let meta = derive_meta(&data.repository, data.package.as_ref());
        self.posts.save_meta(post.id, &meta).await?;

        for (key, value) in meta.iter() {
            post.derived_meta.set(key, value.clone());
        }
        Ok(())
    }

    /// Attach `avatar_url` as the post's feature image. Failures are logged.
    pub async fn set_feature_image(&self, post: &Post, avatar_url: &str) {
        match self
            .media
            .attach_from_url(post.id, MediaCollection::FeatureImage, avatar_url)
            .await
        {
            Ok(media) => tracing::debug!("Feature image of post {} stored at {}", post.id, media.file_path),
            Err(e) => tracing::error!("Failed to add avatar image to post {}: {}", post.id, e),
        }
    }

    /// Fetch metadata, then README and package statistics concurrently.
    async fn fetch_remote(&self, identifier: &str) -> Result<Option<RemoteData>, ImportError> {
        let Some(repository) = self.source.fetch_repository(identifier).await? else {
            return Ok(None);
        };
        if !repository.has_id() {
            tracing::debug!("Repository payload for {} has no id", identifier);
            return Ok(None);
        }

        let branch = repository.default_branch().unwrap_or(DEFAULT_BRANCH);
        let (readme, package) = tokio::join!(
            self.source.fetch_readme(identifier, branch),
            self.fetch_package(repository.full_name()),
        );

        let Some(readme) = readme? else {
            tracing::debug!("Repository {} has no README on {}", identifier, branch);
            return Ok(None);
        };

        Ok(Some(RemoteData {
            repository,
            readme,
            package,
        }))
    }

    /// Packagist statistics; any failure counts as absence.
    async fn fetch_package(&self, full_name: Option<&str>) -> Option<Package> {
        let full_name = full_name?;
        match self.source.fetch_package(full_name).await {
            Ok(package) => package,
            Err(e) => {
                tracing::warn!("Failed to fetch Packagist data for {}: {}", full_name, e);
                None
            }
        }
    }
}

//! Identity resolution of a fetched repository against stored posts.

use domain::{MediaCollection, Post};
use github::Repository;

use super::mapping::slug_from_full_name;
use super::service::ImportService;
use super::types::ImportError;

/// Slug a repository is stored under
pub(crate) fn slug_for(repository: &Repository) -> Result<&str, ImportError> {
    repository
        .full_name()
        .and_then(slug_from_full_name)
        .ok_or_else(|| ImportError::MalformedPayload("repository has no usable full_name".to_string()))
}

impl ImportService {
    /// Resolve the post a repository belongs to.
    ///
    /// Soft-deleted posts are restored with their feature image cleared, live
    /// posts are returned as they are, and an unknown slug yields an unsaved
    /// shell. No other field is written here.
    pub async fn find_or_create(&self, repository: &Repository) -> Result<Post, ImportError> {
        let slug = slug_for(repository)?;

        let Some(mut post) = self.posts.find_by_slug_with_trashed(slug).await? else {
            tracing::debug!("No post for slug '{}', creating one", slug);
            return Ok(Post::new());
        };

        if post.is_trashed() {
            tracing::info!("Restoring soft-deleted post {} ('{}')", post.id, slug);
            self.posts.restore(&mut post).await?;

            if let Err(e) = self
                .media
                .clear(post.id, MediaCollection::FeatureImage)
                .await
            {
                tracing::warn!("Failed to clear feature image of post {}: {}", post.id, e);
            }
        }

        Ok(post)
    }
}

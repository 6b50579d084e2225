//! Post repository traits.
//!
//! Define the abstract interface for Post persistence operations.

use async_trait::async_trait;

use super::{DerivedMeta, Media, MediaCollection, MetaKey, MetaValue, Post};
use crate::error::DomainResult;

/// Post repository trait.
///
/// Concrete implementations are provided in the infrastructure layer.
/// Posts returned by the finders carry their derived metadata.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a Post by its ID, soft-deleted ones included.
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Post>>;

    /// Find a Post by slug, soft-deleted ones included.
    async fn find_by_slug_with_trashed(&self, slug: &str) -> DomainResult<Option<Post>>;

    /// Find live posts of `post_type` with a non-empty source URL.
    async fn find_refreshable(&self, post_type: &str) -> DomainResult<Vec<Post>>;

    /// Save a Post (create or update).
    ///
    /// If the Post has a new ID (0), it will be created and the generated
    /// ID written back. Otherwise, it will be updated.
    async fn save(&self, post: &mut Post) -> DomainResult<()>;

    /// Clear the soft-deletion marker of a stored Post.
    async fn restore(&self, post: &mut Post) -> DomainResult<()>;

    /// Upsert every entry of `meta` for the post. Keys not in `meta` are kept.
    async fn save_meta(&self, post_id: i64, meta: &DerivedMeta) -> DomainResult<()>;

    /// Read a single derived metadata value.
    async fn get_meta(&self, post_id: i64, key: MetaKey) -> DomainResult<Option<MetaValue>>;
}

/// Media repository trait.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Find the media item stored in a collection.
    async fn find(&self, post_id: i64, collection: MediaCollection) -> DomainResult<Option<Media>>;

    /// Store `media` as the single item of its collection.
    ///
    /// Returns the item it replaced, if any.
    async fn replace(&self, media: Media) -> DomainResult<Option<Media>>;

    /// Remove the item of a collection. Returns the removed item, if any.
    async fn clear(&self, post_id: i64, collection: MediaCollection) -> DomainResult<Option<Media>>;
}

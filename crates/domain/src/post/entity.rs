//! Post entity.
//!
//! Represents a CMS content record. Imported open-source projects are
//! posts of type [`OPEN_SOURCE_TYPE`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DerivedMeta;
use crate::shared::{AuthorRef, LocalizedText};

/// Post type assigned to every imported repository.
pub const OPEN_SOURCE_TYPE: &str = "open-source";

/// Post entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Storage identity, `0` until first saved.
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// URL slug. Assigned once, never rewritten.
    pub slug: Option<String>,

    pub title: LocalizedText,
    pub body: LocalizedText,
    pub short_description: LocalizedText,
    pub keywords: LocalizedText,

    pub post_type: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,

    /// URL the post is re-fetched from.
    pub source_url: Option<String>,
    /// Where the admin UI should send the operator after import.
    pub source_redirect: Option<String>,

    pub author: Option<AuthorRef>,

    /// Verbatim upstream payload.
    pub raw_meta: Value,
    /// Flattened scalar projection of `raw_meta` plus registry stats.
    pub derived_meta: DerivedMeta,

    /// Soft-deletion marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create an unsaved post shell.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            slug: None,
            title: LocalizedText::new(),
            body: LocalizedText::new(),
            short_description: LocalizedText::new(),
            keywords: LocalizedText::new(),
            post_type: "post".to_string(),
            is_published: false,
            published_at: None,
            source_url: None,
            source_redirect: None,
            author: None,
            raw_meta: Value::Null,
            derived_meta: DerivedMeta::new(),
            deleted_at: None,
        }
    }

    // === Business Logic ===

    /// Whether the post has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Clear the soft-deletion marker.
    pub fn restore(&mut self) {
        self.deleted_at = None;
    }

    /// Non-empty source URL, if any.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Assign `slug` if the post has none yet. Returns whether it was assigned.
    pub fn assign_slug_if_missing(&mut self, slug: &str) -> bool {
        if self.slug.as_deref().is_some_and(|s| !s.is_empty()) {
            return false;
        }
        self.slug = Some(slug.to_string());
        true
    }

    /// Whether the periodic refresh should pick this post up.
    pub fn is_refreshable(&self) -> bool {
        self.post_type == OPEN_SOURCE_TYPE && self.source_url().is_some() && !self.is_trashed()
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::new()
    }
}

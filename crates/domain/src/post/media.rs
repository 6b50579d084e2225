//! Post media.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named media slot of a post. Each collection holds at most one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCollection {
    FeatureImage,
}

impl MediaCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCollection::FeatureImage => "feature_image",
        }
    }
}

impl std::str::FromStr for MediaCollection {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature_image" => Ok(MediaCollection::FeatureImage),
            other => Err(crate::DomainError::Validation(format!(
                "Unknown media collection: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MediaCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored media file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub post_id: i64,
    pub collection: MediaCollection,
    /// Path of the stored file, relative to the media root.
    pub file_path: String,
    /// URL the file was fetched from.
    pub source_url: String,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

//! Derived metadata.
//!
//! A closed set of named scalars projected from the upstream payloads, so
//! that listings can read stars or downloads without decoding `raw_meta`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Derived metadata key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaKey {
    /// Stargazer count. The stored key keeps its historical spelling.
    #[serde(rename = "github_starts")]
    GithubStars,
    GithubWatchers,
    GithubLanguage,
    GithubForks,
    GithubOpenIssues,
    GithubDefaultBranch,
    GithubDocs,
    DownloadsTotal,
    DownloadsMonthly,
    DownloadsDaily,
}

impl MetaKey {
    pub const ALL: [MetaKey; 10] = [
        MetaKey::GithubStars,
        MetaKey::GithubWatchers,
        MetaKey::GithubLanguage,
        MetaKey::GithubForks,
        MetaKey::GithubOpenIssues,
        MetaKey::GithubDefaultBranch,
        MetaKey::GithubDocs,
        MetaKey::DownloadsTotal,
        MetaKey::DownloadsMonthly,
        MetaKey::DownloadsDaily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaKey::GithubStars => "github_starts",
            MetaKey::GithubWatchers => "github_watchers",
            MetaKey::GithubLanguage => "github_language",
            MetaKey::GithubForks => "github_forks",
            MetaKey::GithubOpenIssues => "github_open_issues",
            MetaKey::GithubDefaultBranch => "github_default_branch",
            MetaKey::GithubDocs => "github_docs",
            MetaKey::DownloadsTotal => "downloads_total",
            MetaKey::DownloadsMonthly => "downloads_monthly",
            MetaKey::DownloadsDaily => "downloads_daily",
        }
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetaKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown meta key: {}", s)))
    }
}

/// Scalar value stored under a [`MetaKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Text(String),
}

impl MetaValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            MetaValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(v) => Some(v),
            MetaValue::Int(_) => None,
        }
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

/// Derived metadata of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedMeta(BTreeMap<MetaKey, MetaValue>);

impl DerivedMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: MetaKey, value: impl Into<MetaValue>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: MetaKey) -> Option<&MetaValue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: MetaKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetaKey, &MetaValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(MetaKey, MetaValue)> for DerivedMeta {
    fn from_iter<I: IntoIterator<Item = (MetaKey, MetaValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trips_through_str() {
        for key in MetaKey::ALL {
            assert_eq!(key.as_str().parse::<MetaKey>().unwrap(), key);
        }
        assert!("github_stars".parse::<MetaKey>().is_err());
    }

    #[test]
    fn test_serde_uses_stored_key_names() {
        let mut meta = DerivedMeta::new();
        meta.set(MetaKey::GithubStars, 10);
        meta.set(MetaKey::GithubLanguage, "Rust");

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["github_starts"], 10);
        assert_eq!(json["github_language"], "Rust");

        let back: DerivedMeta = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(MetaValue::from(5).as_i64(), Some(5));
        assert_eq!(MetaValue::from("main").as_str(), Some("main"));
        assert_eq!(MetaValue::from("main").as_i64(), None);
    }
}

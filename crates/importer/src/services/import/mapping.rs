//! Mapping of remote payloads onto posts.

use chrono::Utc;
use domain::{DerivedMeta, LocalizedText, MetaKey, Post, OPEN_SOURCE_TYPE};
use github::Repository;
use packagist::Package;

use super::types::{ImportError, Provenance, RemoteData};

/// Branch used when the repository does not report one
pub(crate) const DEFAULT_BRANCH: &str = "main";

/// Slug of a repository: the last segment of its `owner/name` full name.
pub fn slug_from_full_name(full_name: &str) -> Option<&str> {
    full_name.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Write the fetched data onto `post`.
///
/// The slug is only assigned when the post has none, and provenance fields
/// only when the caller supplies them, so refreshes can go through the same
/// path without touching either.
pub fn map_github_data(
    post: &mut Post,
    data: &RemoteData,
    provenance: &Provenance,
    locales: &[String],
) -> Result<(), ImportError> {
    let repository = &data.repository;

    post.title = LocalizedText::uniform(locales, repository.name().unwrap_or_default());
    post.body = LocalizedText::uniform(locales, &data.readme);
    post.short_description =
        LocalizedText::uniform(locales, repository.description().unwrap_or_default());

    if post.slug.as_deref().map_or(true, str::is_empty) {
        let slug = repository
            .full_name()
            .and_then(slug_from_full_name)
            .ok_or_else(|| {
                ImportError::MalformedPayload("repository has no usable full_name".to_string())
            })?;
        post.assign_slug_if_missing(slug);
    }

    post.raw_meta = repository.as_value().clone();

    if let Some(url) = &provenance.source_url {
        post.source_url = Some(url.clone());
    }
    if let Some(redirect) = &provenance.source_redirect {
        post.source_redirect = Some(redirect.clone());
    }

    post.post_type = OPEN_SOURCE_TYPE.to_string();
    post.is_published = true;
    post.published_at = Some(Utc::now());

    if let Some(author) = &provenance.author {
        post.author = Some(author.clone());
    }

    if let Some(package) = &data.package {
        post.keywords = LocalizedText::uniform(locales, &package.keywords().join(","));
    }

    Ok(())
}

/// Flattened scalar projection of the repository and package payloads.
///
/// GitHub fields are always present, with defaults for missing values.
/// Download counters only appear when package statistics are available.
pub fn derive_meta(repository: &Repository, package: Option<&Package>) -> DerivedMeta {
    let mut meta = DerivedMeta::new();

    if let Some(package) = package {
        let downloads = package.downloads();
        meta.set(MetaKey::DownloadsTotal, downloads.total);
        meta.set(MetaKey::DownloadsMonthly, downloads.monthly);
        meta.set(MetaKey::DownloadsDaily, downloads.daily);
    }

    meta.set(MetaKey::GithubStars, repository.stargazers_count().unwrap_or(0));
    meta.set(MetaKey::GithubWatchers, repository.watchers_count().unwrap_or(0));
    meta.set(MetaKey::GithubLanguage, repository.language().unwrap_or_default());
    meta.set(MetaKey::GithubForks, repository.forks_count().unwrap_or(0));
    meta.set(MetaKey::GithubOpenIssues, repository.open_issues_count().unwrap_or(0));
    meta.set(
        MetaKey::GithubDefaultBranch,
        repository.default_branch().unwrap_or(DEFAULT_BRANCH),
    );
    meta.set(MetaKey::GithubDocs, repository.homepage().unwrap_or_default());

    meta
}

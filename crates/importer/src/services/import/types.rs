//! Types shared by the import pipeline.

use domain::{AuthorRef, DomainError};
use github::Repository;
use packagist::Package;
use thiserror::Error;

use crate::services::remote::FetchError;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// A request to import one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub url: String,
    /// Where the admin UI should go once the import is done
    pub redirect: Option<String>,
    pub author: Option<AuthorRef>,
}

impl ImportRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            redirect: None,
            author: None,
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn with_author(mut self, author: AuthorRef) -> Self {
        self.author = Some(author);
        self
    }
}

/// Caller-supplied fields written by the mapper.
///
/// Refreshes use the default, which leaves the stored values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub source_url: Option<String>,
    pub source_redirect: Option<String>,
    pub author: Option<AuthorRef>,
}

impl From<&ImportRequest> for Provenance {
    fn from(request: &ImportRequest) -> Self {
        Self {
            source_url: Some(request.url.clone()),
            source_redirect: request.redirect.clone(),
            author: request.author.clone(),
        }
    }
}

/// Everything fetched for one repository
#[derive(Debug, Clone)]
pub struct RemoteData {
    pub repository: Repository,
    pub readme: String,
    pub package: Option<Package>,
}

/// Outcome of a bulk refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Posts a refresh was attempted for
    pub attempted: usize,
    pub succeeded: usize,
    /// Posts whose source data was missing
    pub skipped: usize,
    /// Posts that hit an unexpected error
    pub failed: usize,
}

impl std::fmt::Display for RefreshStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} refreshed ({} skipped, {} failed)",
            self.succeeded, self.attempted, self.skipped, self.failed
        )
    }
}

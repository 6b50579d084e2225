use async_trait::async_trait;
use github::{GithubClient, GithubError, Repository};
use packagist::{Package, PackagistClient, PackagistError};
use std::sync::Arc;
use thiserror::Error;

/// Unexpected failure while talking to a remote source.
///
/// Missing data is not a failure: every fetch returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub request failed: {0}")]
    Github(#[from] GithubError),
    #[error("Packagist request failed: {0}")]
    Packagist(#[from] PackagistError),
}

/// Remote sources an import reads from.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Repository metadata for an `owner/name` identifier.
    async fn fetch_repository(&self, identifier: &str) -> Result<Option<Repository>, FetchError>;

    /// Raw README of the repository on `branch`.
    async fn fetch_readme(&self, identifier: &str, branch: &str) -> Result<Option<String>, FetchError>;

    /// Packagist statistics for a package named after the repository.
    async fn fetch_package(&self, full_name: &str) -> Result<Option<Package>, FetchError>;
}

/// [`RemoteSource`] backed by the GitHub and Packagist HTTP clients
pub struct HttpRemoteSource {
    github: Arc<GithubClient>,
    packagist: Arc<PackagistClient>,
}

impl HttpRemoteSource {
    pub fn new(github: Arc<GithubClient>, packagist: Arc<PackagistClient>) -> Self {
        Self { github, packagist }
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_repository(&self, identifier: &str) -> Result<Option<Repository>, FetchError> {
        Ok(self.github.get_repository(identifier).await?)
    }

    async fn fetch_readme(&self, identifier: &str, branch: &str) -> Result<Option<String>, FetchError> {
        Ok(self.github.get_readme(identifier, branch).await?)
    }

    async fn fetch_package(&self, full_name: &str) -> Result<Option<Package>, FetchError> {
        Ok(self.packagist.get_package(full_name).await?)
    }
}

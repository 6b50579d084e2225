use async_trait::async_trait;
use chrono::Utc;
use domain::{DomainError, Media, MediaCollection, MediaRepository};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] DomainError),
    #[error("Empty response body from {0}")]
    EmptyBody(String),
}

/// Storage for files attached to posts.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Download `url` and make it the single item of `collection`.
    async fn attach_from_url(
        &self,
        post_id: i64,
        collection: MediaCollection,
        url: &str,
    ) -> Result<Media, MediaError>;

    /// Empty `collection`, deleting its stored file.
    async fn clear(&self, post_id: i64, collection: MediaCollection) -> Result<(), MediaError>;
}

/// Media store writing files under a local directory
pub struct MediaService {
    client: Client,
    root: PathBuf,
    repository: Arc<dyn MediaRepository>,
}

impl MediaService {
    pub fn new(client: Client, root: PathBuf, repository: Arc<dyn MediaRepository>) -> Self {
        Self {
            client,
            root,
            repository,
        }
    }

    async fn remove_file(&self, media: &Media) {
        let path = self.root.join(&media.file_path);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed media file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove media file {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl MediaStore for MediaService {
    async fn attach_from_url(
        &self,
        post_id: i64,
        collection: MediaCollection,
        url: &str,
    ) -> Result<Media, MediaError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyBody(url.to_string()));
        }

        let file_path = format!(
            "posts/{}/{}.{}",
            post_id,
            collection,
            extension_for(content_type.as_deref())
        );
        let path = self.root.join(&file_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        let media = Media {
            post_id,
            collection,
            file_path,
            source_url: url.to_string(),
            content_type,
            created_at: Utc::now(),
        };

        if let Some(previous) = self.repository.replace(media.clone()).await? {
            if previous.file_path != media.file_path {
                self.remove_file(&previous).await;
            }
        }

        tracing::debug!(
            "Attached {} to post {} as {} ({} bytes)",
            url,
            post_id,
            collection,
            bytes.len()
        );

        Ok(media)
    }

    async fn clear(&self, post_id: i64, collection: MediaCollection) -> Result<(), MediaError> {
        if let Some(removed) = self.repository.clear(post_id, collection).await? {
            self.remove_file(&removed).await;
        }
        Ok(())
    }
}

/// File extension for an image content type, `jpg` when unknown
pub(crate) fn extension_for(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        Some("image/svg+xml") => "svg",
        _ => "jpg",
    }
}

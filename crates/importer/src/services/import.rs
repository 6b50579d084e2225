//! GitHub import service.
//!
//! Turns a repository URL into an `open-source` post and keeps imported
//! posts in sync with their source:
//!
//! - Fetching repository metadata, README and Packagist statistics
//! - Reconciling the repository against existing posts by slug, restoring
//!   soft-deleted ones
//! - Mapping the payloads onto the post and its derived metadata
//! - Attaching the owner avatar as feature image (best-effort)
//! - Refreshing every imported post in bulk
//!
//! # Usage
//!
//! ```ignore
//! let service = ImportService::new(posts, source, media, events);
//! let post = service.import_repository(ImportRequest::new(url)).await?;
//! ```

mod locks;
mod mapping;
mod reconcile;
mod service;
mod types;

#[cfg(test)]
pub(crate) mod mocks;

pub use mapping::{derive_meta, map_github_data, slug_from_full_name};
pub use service::ImportService;
pub use types::{ImportError, ImportRequest, Provenance, RefreshStats, RemoteData};

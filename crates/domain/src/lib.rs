//! Domain layer for the GitHub project importer.
//!
//! This crate contains the content model the importer writes into: the
//! CMS post, its derived metadata projection and its media. It is kept
//! independent of databases and HTTP clients.
//!
//! # Module Structure
//!
//! - **post**: the Post aggregate, derived metadata keys, media, and the
//!   repository traits (traits only; implementations live in the importer)
//! - **shared**: value objects used across modules (localized text, author
//!   references)

pub mod error;
pub mod post;
pub mod shared;

// Re-exports for convenience
pub use error::{DomainError, DomainResult};
pub use post::{
    DerivedMeta, Media, MediaCollection, MediaRepository, MetaKey, MetaValue, Post,
    PostRepository, OPEN_SOURCE_TYPE,
};
pub use shared::*;

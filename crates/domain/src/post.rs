//! Post domain module.
//!
//! Contains the Post entity, its derived metadata and media, and the
//! repository traits used to persist them.

mod entity;
mod media;
mod meta;
mod repository;

pub use entity::{Post, OPEN_SOURCE_TYPE};
pub use media::{Media, MediaCollection};
pub use meta::{DerivedMeta, MetaKey, MetaValue};
pub use repository::{MediaRepository, PostRepository};

//! Shared value objects used across domain modules.
//!
//! These value objects are used by multiple domains and don't belong
//! to any single aggregate.

mod author;
mod localized;

pub use author::AuthorRef;
pub use localized::LocalizedText;

//! Minimal GitHub client for repository metadata and raw README content.
//!
//! Both endpoints are unauthenticated GETs. A non-success status is not an
//! error here: the repository may not exist or may not carry a README, so
//! every fetch returns `Ok(None)` in that case and reserves `Err` for
//! transport and decoding failures.

mod client;
mod error;
pub mod models;
mod readme;
mod repos;
#[cfg(test)]
mod test_server;

pub use client::GithubClient;
pub use error::GithubError;
pub use models::Repository;

pub type Result<T> = std::result::Result<T, GithubError>;

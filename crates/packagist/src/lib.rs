//! Packagist package statistics client.
//!
//! Packagist reports unknown packages with a `status` key in the body, and
//! does so even on some 200 responses. Such bodies are treated the same as a
//! failed request: the package is simply absent.

mod client;
mod error;
pub mod models;
mod packages;
#[cfg(test)]
mod test_server;

pub use client::PackagistClient;
pub use error::PackagistError;
pub use models::{Downloads, Package};

pub type Result<T> = std::result::Result<T, PackagistError>;

//! GitHub project importer.
//!
//! Imports GitHub repositories as CMS posts, enriched with Packagist
//! statistics, and keeps them up to date with a periodic refresh.

pub mod config;
pub mod db;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
#[cfg(test)]
pub(crate) mod test_server;

pub use config::Config;
pub use state::AppState;

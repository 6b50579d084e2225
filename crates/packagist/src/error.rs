use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackagistError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

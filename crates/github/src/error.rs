use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

use crate::client::{absent_on_timeout, GithubClient};

impl GithubClient {
    /// Get the raw README.md of a branch
    /// GET {raw}/{owner}/{name}/{branch}/README.md
    ///
    /// A blank body is reported as missing.
    pub async fn get_readme(&self, identifier: &str, branch: &str) -> crate::Result<Option<String>> {
        let url = self.raw_url(&format!("/{}/{}/README.md", identifier, branch));
        let Some(response) = self.get_successful(&url).await? else {
            return Ok(None);
        };

        let Some(body) = absent_on_timeout(response.text().await)? else {
            return Ok(None);
        };

        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(body))
    }
}

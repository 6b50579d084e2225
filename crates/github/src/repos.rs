use crate::client::{absent_on_timeout, GithubClient};
use crate::models::Repository;

impl GithubClient {
    /// Get repository metadata
    /// GET /repos/{owner}/{name}
    pub async fn get_repository(&self, identifier: &str) -> crate::Result<Option<Repository>> {
        let url = self.api_url(&format!("/repos/{}", identifier));
        let Some(response) = self.get_successful(&url).await? else {
            return Ok(None);
        };

        let Some(bytes) = absent_on_timeout(response.bytes().await)? else {
            return Ok(None);
        };

        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(Some(Repository::from_value(value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_server::{Reply, StubServer};
    use crate::{GithubClient, GithubError};
    use reqwest::Client;
    use std::time::Duration;

    fn client(server: &StubServer) -> GithubClient {
        let http = Client::builder()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        GithubClient::with_client(http).with_base_urls(
            format!("{}/api", server.base_url),
            format!("{}/raw", server.base_url),
        )
    }

    #[tokio::test]
    async fn test_get_repository() {
        let server = StubServer::start(vec![(
            "/api/repos/acme/widget",
            Reply::ok(r#"{"id":1,"full_name":"acme/widget","default_branch":"dev"}"#),
        )])
        .await;

        let repository = client(&server)
            .get_repository("acme/widget")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(repository.full_name(), Some("acme/widget"));
        assert_eq!(repository.default_branch(), Some("dev"));
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("user-agent: cms-github-importer"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_absent() {
        let server = StubServer::start(vec![
            ("/api/repos/acme/broken", Reply::status(500, "oops")),
            ("/api/repos/acme/private", Reply::status(403, "{}")),
        ])
        .await;
        let client = client(&server);

        assert!(client.get_repository("acme/missing").await.unwrap().is_none());
        assert!(client.get_repository("acme/broken").await.unwrap().is_none());
        assert!(client.get_repository("acme/private").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_absent() {
        let server = StubServer::start(vec![("/api/repos/acme/slow", Reply::stall())]).await;

        let result = client(&server).get_repository("acme/slow").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_an_error() {
        let server = StubServer::start(vec![("/api/repos/acme/widget", Reply::ok("<html>"))]).await;

        let err = client(&server).get_repository("acme/widget").await.unwrap_err();
        assert!(matches!(err, GithubError::Json(_)));
    }
}

use reqwest::{Client, Response};

const API_BASE_URL: &str = "https://api.github.com";
const RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub(crate) const DEFAULT_USER_AGENT: &str = "cms-github-importer";

pub struct GithubClient {
    client: Client,
    api_base: String,
    raw_base: String,
    user_agent: String,
}

impl GithubClient {
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            api_base: API_BASE_URL.to_string(),
            raw_base: RAW_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Override the API and raw-content hosts (mirrors, proxies).
    pub fn with_base_urls(mut self, api_base: impl Into<String>, raw_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.raw_base = raw_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub(crate) fn raw_url(&self, path: &str) -> String {
        format!("{}{}", self.raw_base, path)
    }

    /// Issue a GET and return the response only when the status is a success.
    ///
    /// Timeouts are folded into `Ok(None)` together with non-success statuses.
    pub(crate) async fn get_successful(&self, url: &str) -> crate::Result<Option<Response>> {
        let result = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await;

        let response = match absent_on_timeout(result)? {
            Some(response) => response,
            None => {
                tracing::debug!("GitHub request timed out: {}", url);
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GitHub returned {} for {}", status.as_u16(), url);
            return Ok(None);
        }

        Ok(Some(response))
    }
}

pub(crate) fn absent_on_timeout<T>(
    result: Result<T, reqwest::Error>,
) -> crate::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_timeout() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

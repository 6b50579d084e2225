use serde_json::Value;

use crate::client::PackagistClient;
use crate::models::Package;

impl PackagistClient {
    /// Get package details and download statistics
    /// GET /packages/{vendor}/{name}.json
    pub async fn get_package(&self, full_name: &str) -> crate::Result<Option<Package>> {
        let url = self.url(&format!("/packages/{}.json", full_name));
        let result = self
            .client()
            .get(&url)
            .header(reqwest::header::USER_AGENT, self.user_agent())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::debug!("Packagist request timed out: {}", url);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Packagist returned {} for {}", status.as_u16(), url);
            return Ok(None);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if e.is_timeout() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(parse_package(&bytes))
    }
}

/// Decode a package document, treating a `status` key or an undecodable
/// body as "not on Packagist".
pub(crate) fn parse_package(bytes: &[u8]) -> Option<Package> {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to decode Packagist response: {}", e);
            return None;
        }
    };

    if !value.is_object() || value.get("status").is_some() {
        return None;
    }

    Some(Package::from_value(value))
}

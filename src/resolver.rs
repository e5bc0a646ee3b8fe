//! Public IP resolution.

use crate::error::{DdnsError, Result};
use std::time::Duration;

/// IP echo endpoint queried by the production resolver. Its certificate
/// chain does not validate, so verification is off for this client.
const LOOKUP_ENDPOINT: &str = "https://ipcurl.net/n";

/// Resolves the caller's public IP from an external echo service.
pub struct IpResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl IpResolver {
    /// Create a resolver aimed at the default lookup endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(LOOKUP_ENDPOINT.to_string())
    }

    /// Create a resolver with a custom endpoint (for testing).
    pub fn with_endpoint(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoint }
    }

    /// Fetch the public IP. Returns the trimmed response body verbatim;
    /// the value is not parsed or validated here.
    pub async fn resolve(&self) -> Result<String> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpLookup(format!(
                "HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let text = response.text().await?;
        let ip = text.trim();
        tracing::debug!(%ip, endpoint = %self.endpoint, "lookup response");

        Ok(ip.to_string())
    }
}

impl Default for IpResolver {
    fn default() -> Self {
        Self::new()
    }
}

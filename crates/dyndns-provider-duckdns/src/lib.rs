// # DuckDNS Update Provider
//
// This crate implements the `UpdateProvider` trait against the DuckDNS
// plaintext update API.
//
// ## Wire contract
//
// One GET per update:
//
// ```text
// https://www.duckdns.org/update?domains=<domain>&token=<token>[&ipv6=<addr>][&ip=<addr>]
// ```
//
// The response body is plain text; the literal `OK` denotes success and
// anything else (typically `KO`) is a rejection. DuckDNS publishes records
// under `<domain>.duckdns.org`.
//
// The provider is single-shot and stateless: it builds the URL, performs
// one request, and reports the raw status/body pair. Whether and when to
// call it is the reconciler's decision.

use dyndns_core::traits::{UpdateOutcome, UpdateProvider, UpdateRequest};
use dyndns_core::{Error, Result};

use std::time::Duration;

/// DuckDNS update endpoint
const DEFAULT_BASE_URL: &str = "https://www.duckdns.org/update";

/// Zone under which DuckDNS publishes every registered domain
const DUCKDNS_ZONE: &str = "duckdns.org";

/// Per-request timeout, same bound as the probers
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// DuckDNS provider
pub struct DuckDnsProvider {
    base_url: String,
    client: reqwest::Client,
}

impl DuckDnsProvider {
    /// Create a provider pointed at the real DuckDNS endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider pointed at a custom endpoint (for tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Build the update URL for a request.
    ///
    /// Parameters are attached exactly as the reconciler decided them:
    /// `ipv6` only when present on the request, `ip` likewise.
    fn update_url(&self, request: &UpdateRequest) -> Result<reqwest::Url> {
        let mut params: Vec<(&str, &str)> = vec![
            ("domains", request.domain.as_str()),
            ("token", request.token.as_str()),
        ];
        if let Some(ipv6) = &request.ipv6 {
            params.push(("ipv6", ipv6.as_str()));
        }
        if let Some(ipv4) = &request.ipv4 {
            params.push(("ip", ipv4.as_str()));
        }

        reqwest::Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| Error::provider("duckdns", format!("invalid update URL: {e}")))
    }
}

impl Default for DuckDnsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UpdateProvider for DuckDnsProvider {
    fn record_fqdn(&self, domain: &str) -> String {
        format!("{domain}.{DUCKDNS_ZONE}")
    }

    async fn submit(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let url = self.update_url(request)?;
        tracing::debug!(domain = %request.domain, "submitting update");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::provider("duckdns", format!("request failed: {e}")))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider("duckdns", format!("failed to read response: {e}")))?;

        Ok(UpdateOutcome::new(status_code, body))
    }

    fn provider_name(&self) -> &'static str {
        "duckdns"
    }
}

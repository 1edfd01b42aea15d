// # HTTP Address Prober
//
// This crate implements the `AddressProber` trait over reqwest.
//
// ## Purpose
//
// Public "what is my IP" endpoints (e.g. ipify, icanhazip) echo the
// caller's observed address back as a plaintext body. The prober issues a
// bounded GET and hands the raw status/body pair to the core without
// interpreting it.
//
// ## Failure mapping
//
// Every transport failure — connect error, timeout, unreadable body — maps
// to `ProbeResult::failed()` (`{0, ""}`). The reconciler treats the empty
// body as "endpoint unavailable this cycle" and retries on the next
// interval; this crate never returns an error.

use dyndns_core::traits::{AddressProber, ProbeResult};

use std::time::Duration;

/// Per-request timeout, so a stalled endpoint cannot stall the loop
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based address prober
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with the default bounded timeout
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AddressProber for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "probe request failed");
                return ProbeResult::failed();
            }
        };

        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to read probe response");
                return ProbeResult::failed();
            }
        };

        // Echo endpoints commonly terminate the body with a newline; a raw
        // body would never compare equal to a resolver-rendered address.
        ProbeResult::new(status_code, body.trim())
    }
}

// # Address Prober Trait
//
// Defines the interface for discovering the caller's current public address
// by issuing an HTTP GET against an "IP echo" endpoint that returns the
// observed address as the response body.
//
// ## Implementations
//
// - HTTP-based: `dyndns-probe-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::AddressProber;
//
// #[tokio::main]
// async fn main() {
//     let prober = /* AddressProber implementation */;
//
//     let result = prober.probe("https://ipv6.icanhazip.com").await;
//     println!("status={} body={}", result.status_code, result.body);
// }
// ```

use async_trait::async_trait;

/// Result of probing an echo endpoint
///
/// The body is the candidate current address as an untyped string; no
/// IP-format validation is performed anywhere in the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// HTTP status code (0 on transport failure)
    pub status_code: u16,
    /// Response body (empty on transport failure or timeout)
    pub body: String,
}

impl ProbeResult {
    /// Create a probe result
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// The result returned for any transport failure or timeout
    pub fn failed() -> Self {
        Self {
            status_code: 0,
            body: String::new(),
        }
    }

    /// Whether anything usable came back
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Trait for address prober implementations
///
/// The probe is infallible by contract: implementations must map every
/// transport failure and timeout to [`ProbeResult::failed`] (`{0, ""}`)
/// rather than returning an error. The [`Reconciler`](crate::Reconciler)
/// treats an empty body as "endpoint unavailable this cycle" and retries on
/// the next interval.
///
/// Implementations must apply a bounded per-request timeout so a single
/// call can never stall the reconciliation loop indefinitely.
///
/// Probers are transport only: they must not parse, validate, or normalize
/// the returned address beyond whitespace trimming, and must not decide
/// whether an update is needed (owned by the `Reconciler`).
#[async_trait]
pub trait AddressProber: Send + Sync {
    /// Perform an HTTP GET against `url` and return the status and body.
    async fn probe(&self, url: &str) -> ProbeResult;
}

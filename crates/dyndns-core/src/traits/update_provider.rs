// # Update Provider Trait
//
// Defines the interface for submitting record updates to a dynamic-DNS
// provider's HTTP API.
//
// ## Implementations
//
// - DuckDNS: `dyndns-provider-duckdns` crate
//
// ## Trust boundary
//
// Providers are single-shot and stateless: one `submit` call performs one
// API request and reports what came back. Providers must not retry, sleep,
// spawn tasks, or decide whether an update is needed; scheduling and
// decision logic are owned by the `Reconciler`.

use async_trait::async_trait;
use serde::Serialize;

/// One update request, assembled by the `Reconciler` per its decision rules.
///
/// `ipv6` is attached only when the IPv6 record changed. `ipv4` is attached
/// whenever IPv4 tracking is enabled and a non-empty IPv4 body was probed
/// this cycle, independent of whether the IPv4 record changed — the provider
/// receives the freshest read whenever one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    /// Hostname label registered with the provider
    pub domain: String,
    /// Auth token (never logged)
    pub token: String,
    /// New IPv6 address, present iff the IPv6 record changed
    pub ipv6: Option<String>,
    /// Current IPv4 address, present iff IPv4 is enabled and probed non-empty
    pub ipv4: Option<String>,
}

/// Response of an update call
///
/// By provider convention the literal body `"OK"` is the only recognized
/// success marker; no additional status-code branching is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// HTTP status code (0 on transport failure)
    pub status_code: u16,
    /// Plaintext response body
    pub body: String,
}

impl UpdateOutcome {
    /// Create an update outcome
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// The outcome recorded when the update call itself failed in transport
    pub fn failed() -> Self {
        Self {
            status_code: 0,
            body: String::new(),
        }
    }

    /// Whether the provider acknowledged the update
    pub fn is_ok(&self) -> bool {
        self.body == "OK"
    }
}

/// Trait for update provider implementations
#[async_trait]
pub trait UpdateProvider: Send + Sync {
    /// The fully-qualified name the provider publishes for `domain`.
    ///
    /// The `Reconciler` resolves this name when comparing DNS state against
    /// probed addresses.
    fn record_fqdn(&self, domain: &str) -> String;

    /// Submit one update request.
    ///
    /// A transport-level failure may be returned as an error; the
    /// `Reconciler` degrades it to [`UpdateOutcome::failed`] and carries on.
    async fn submit(&self, request: &UpdateRequest) -> Result<UpdateOutcome, crate::Error>;

    /// Provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}

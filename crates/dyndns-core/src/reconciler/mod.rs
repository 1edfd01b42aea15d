//! Core reconciliation loop
//!
//! The Reconciler is responsible for:
//! - Probing the caller's current public addresses via AddressProber
//! - Resolving what the tracked FQDN currently publishes via NameResolver
//! - Deciding whether an update is needed
//! - Submitting updates via UpdateProvider
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ AddressProber │── current addresses ──┐
//! └───────────────┘                       │
//!                                         ▼
//!                                ┌──────────────┐
//!                                │  Reconciler  │◄── interval timer
//!                                └──────────────┘
//!                                         │
//!              ┌──────────────────────────┼──────────────────────────┐
//!              │                          │                          │
//!              ▼                          ▼                          ▼
//!      ┌──────────────┐          ┌────────────────┐          ┌─────────────┐
//!      │ NameResolver │          │ UpdateProvider │          │   Events    │
//!      │  (compare)   │          │  (if changed)  │          │  (notify)   │
//!      └──────────────┘          └────────────────┘          └─────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Probe the IPv6 endpoint; an empty body skips the rest of the cycle
//! 2. Resolve the FQDN and compare (exact string inequality)
//! 3. If IPv4 tracking is enabled, probe and compare the IPv4 side
//! 4. If anything changed, submit one update request
//! 5. Sleep for the configured interval regardless of branch
//!
//! Every value derived in a cycle is dropped at its end; the only state the
//! Reconciler carries across cycles is the immutable config and the
//! last-completed timestamp (observability only).

use crate::config::Config;
use crate::error::Result;
use crate::traits::{
    AddressFamily, AddressProber, NameResolver, UpdateOutcome, UpdateProvider, UpdateRequest,
};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the Reconciler for external monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// Loop started
    Started {
        domain: String,
        ipv4_enabled: bool,
    },

    /// The IPv6 probe came back empty; the cycle was skipped
    ProbeFailed {
        endpoint: String,
    },

    /// Addresses match what DNS publishes; nothing to do
    NoChangeNeeded {
        ipv6: String,
        ipv4: Option<String>,
    },

    /// An update request was submitted to the provider
    UpdateSubmitted {
        ipv6_changed: bool,
        ipv4_changed: bool,
    },

    /// The provider acknowledged the update
    UpdateApplied {
        body: String,
    },

    /// The provider answered with something other than the success marker
    UpdateRejected {
        body: String,
    },

    /// Loop stopped
    Stopped {
        reason: String,
    },
}

/// Change decision derived once per cycle
///
/// Invariant: `ipv4_changed` can only be true when `ipv4_enabled` and the
/// probed IPv4 body was non-empty — an unreachable IPv4 endpoint is
/// "unknown", never "changed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDecision {
    pub ipv6_changed: bool,
    pub ipv4_changed: bool,
    pub ipv4_enabled: bool,
}

impl ChangeDecision {
    /// Whether this cycle needs an update at all
    pub fn any_changed(&self) -> bool {
        self.ipv6_changed || self.ipv4_changed
    }
}

/// Outcome of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResult {
    /// The IPv6 probe came back empty; nothing else ran this cycle
    ProbeFailed,

    /// Nothing changed; no update was submitted.
    /// `ipv4` is `None` when IPv4 tracking is disabled.
    NoChange {
        ipv6: String,
        ipv4: Option<String>,
    },

    /// An update was submitted
    Updated {
        decision: ChangeDecision,
        outcome: UpdateOutcome,
    },
}

/// Core reconciler
///
/// Drives an unbounded sequence of fixed-interval reconciliation cycles.
/// Each cycle is a function from (config, current network/DNS state) to a
/// [`CycleResult`]; the loop around it owns only the timer and the shutdown
/// signal, so the decision logic is unit-testable with injected fakes.
///
/// ## Failure semantics
///
/// Nothing inside a cycle is fatal. A failed probe or resolution flows
/// through the decision logic as an empty string (fail-open toward "no
/// unnecessary update"), a failed update call is logged and retried on the
/// next interval. The fixed interval is the only retry mechanism; there is
/// no backoff.
pub struct Reconciler {
    /// Probes echo endpoints for the current public addresses
    prober: Box<dyn AddressProber>,

    /// Resolves what the tracked FQDN currently publishes
    resolver: Box<dyn NameResolver>,

    /// Submits updates to the dynamic-DNS API
    provider: Box<dyn UpdateProvider>,

    /// Immutable daemon configuration
    config: Config,

    /// When the most recent cycle finished (observability only)
    last_completed: Mutex<Option<DateTime<Utc>>>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<CycleEvent>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Returns
    ///
    /// A tuple of (reconciler, event_receiver) where event_receiver yields
    /// [`CycleEvent`]s for monitoring/logging.
    pub fn new(
        prober: Box<dyn AddressProber>,
        resolver: Box<dyn NameResolver>,
        provider: Box<dyn UpdateProvider>,
        config: Config,
    ) -> Result<(Self, mpsc::Receiver<CycleEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let reconciler = Self {
            prober,
            resolver,
            provider,
            config,
            last_completed: Mutex::new(None),
            event_tx: tx,
        };

        Ok((reconciler, rx))
    }

    /// Run the reconciliation loop until Ctrl-C.
    ///
    /// The loop has no terminal state of its own; it cycles forever at the
    /// configured interval until the process is stopped.
    pub async fn run(&self) -> Result<()> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(());
            }
        });
        self.run_with_shutdown(Some(rx)).await
    }

    /// Run the reconciliation loop with an injectable shutdown signal.
    ///
    /// The signal interrupts a pending inter-cycle sleep, so shutdown is
    /// prompt even with long intervals. The daemon drives this from
    /// SIGTERM/SIGINT; tests drive it directly. Passing `None` runs forever.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(CycleEvent::Started {
            domain: self.config.domain.clone(),
            ipv4_enabled: self.config.ipv4_enabled(),
        });
        info!(
            domain = %self.config.domain,
            provider = self.provider.provider_name(),
            interval_secs = self.config.interval_secs,
            ipv4_enabled = self.config.ipv4_enabled(),
            "reconciliation loop started"
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        let mut shutdown_rx = shutdown_rx;

        loop {
            let result = self.run_cycle().await;
            debug!(?result, "cycle completed");
            *self.last_completed.lock().expect("lock poisoned") = Some(Utc::now());

            debug!(secs = interval.as_secs(), "sleeping until next cycle");
            if let Some(rx) = shutdown_rx.as_mut() {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = rx => {
                        info!("shutdown signal received");
                        self.emit_event(CycleEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        return Ok(());
                    }
                }
            } else {
                tokio::time::sleep(interval).await;
            }
        }
    }

    /// Execute one reconciliation cycle.
    ///
    /// Public so the decision logic can be exercised without the loop: one
    /// call probes, resolves, decides, and (when needed) updates. Nothing in
    /// a cycle is fatal; every failure degrades to an empty value and the
    /// next interval tries again.
    pub async fn run_cycle(&self) -> CycleResult {
        // IPv6 detection
        let ipv6_probe = self.prober.probe(&self.config.ipv6_endpoint).await;
        debug!(
            status = ipv6_probe.status_code,
            body = %ipv6_probe.body,
            "IPv6 probe"
        );

        if ipv6_probe.is_empty() {
            error!(
                endpoint = %self.config.ipv6_endpoint,
                "failed to fetch IPv6 from endpoint"
            );
            self.emit_event(CycleEvent::ProbeFailed {
                endpoint: self.config.ipv6_endpoint.clone(),
            });
            return CycleResult::ProbeFailed;
        }
        let local_ipv6 = ipv6_probe.body;

        let fqdn = self.provider.record_fqdn(&self.config.domain);
        let dns_ipv6 = self.resolver.resolve(&fqdn, AddressFamily::V6).await;

        // Exact string inequality, not semantic address comparison: a
        // resolver that formats the same address differently counts as a
        // change. An empty snapshot (no record) always counts as a change.
        let ipv6_changed = dns_ipv6 != local_ipv6;

        // IPv4 detection (optional)
        let ipv4_enabled = self.config.ipv4_enabled();
        let mut local_ipv4 = String::new();
        let mut ipv4_changed = false;

        if let Some(ipv4_endpoint) = &self.config.ipv4_endpoint {
            let ipv4_probe = self.prober.probe(ipv4_endpoint).await;
            debug!(
                status = ipv4_probe.status_code,
                body = %ipv4_probe.body,
                "IPv4 probe"
            );
            local_ipv4 = ipv4_probe.body;

            // An empty IPv4 body means "endpoint down", not "address
            // changed"; the cycle still proceeds on the IPv6 result.
            if !local_ipv4.is_empty() {
                let dns_ipv4 = self.resolver.resolve(&fqdn, AddressFamily::V4).await;
                if dns_ipv4 != local_ipv4 {
                    ipv4_changed = true;
                }
            } else {
                warn!(endpoint = %ipv4_endpoint, "IPv4 probe came back empty");
            }
        }

        let decision = ChangeDecision {
            ipv6_changed,
            ipv4_changed,
            ipv4_enabled,
        };

        if !decision.any_changed() {
            let ipv4_display = if ipv4_enabled { local_ipv4.as_str() } else { "disabled" };
            info!(ipv6 = %local_ipv6, ipv4 = ipv4_display, "no update needed");
            self.emit_event(CycleEvent::NoChangeNeeded {
                ipv6: local_ipv6.clone(),
                ipv4: ipv4_enabled.then(|| local_ipv4.clone()),
            });
            return CycleResult::NoChange {
                ipv6: local_ipv6,
                ipv4: ipv4_enabled.then_some(local_ipv4),
            };
        }

        // The IPv6 address is attached only when it changed; the IPv4
        // address rides along whenever IPv4 is enabled and a non-empty body
        // was read this cycle, even if it is unchanged.
        let request = UpdateRequest {
            domain: self.config.domain.clone(),
            token: self.config.token.clone(),
            ipv6: ipv6_changed.then(|| local_ipv6.clone()),
            ipv4: (ipv4_enabled && !local_ipv4.is_empty()).then(|| local_ipv4.clone()),
        };

        self.emit_event(CycleEvent::UpdateSubmitted {
            ipv6_changed,
            ipv4_changed,
        });

        let outcome = match self.provider.submit(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "update call failed in transport"
                );
                UpdateOutcome::failed()
            }
        };

        if outcome.is_ok() {
            info!(
                ipv6_changed,
                ipv4_changed,
                status = outcome.status_code,
                "update applied"
            );
            self.emit_event(CycleEvent::UpdateApplied {
                body: outcome.body.clone(),
            });
        } else {
            // The provider's textual response is the sole signal; anything
            // other than "OK" is diagnostic, not an error.
            info!(
                ipv6_changed,
                ipv4_changed,
                status = outcome.status_code,
                body = %outcome.body,
                "provider did not acknowledge update"
            );
            self.emit_event(CycleEvent::UpdateRejected {
                body: outcome.body.clone(),
            });
        }

        CycleResult::Updated { decision, outcome }
    }

    /// When the most recent cycle finished, if any has.
    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_completed.lock().expect("lock poisoned")
    }

    /// Emit a cycle event
    fn emit_event(&self, event: CycleEvent) {
        // Monitoring must never block the loop; when the channel is full
        // the event is dropped with a warning.
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping event");
        }
    }
}

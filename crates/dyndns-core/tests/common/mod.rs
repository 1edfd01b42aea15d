//! Test doubles and common utilities for the cycle contract tests
//!
//! The doubles are cheaply cloneable: clones share their counters and
//! recorded calls, so a test can hand one clone to the Reconciler and keep
//! another for assertions.

use dyndns_core::config::Config;
use dyndns_core::traits::{
    AddressFamily, AddressProber, NameResolver, ProbeResult, UpdateOutcome, UpdateProvider,
    UpdateRequest,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const V6_ENDPOINT: &str = "https://v6.echo.test/";
pub const V4_ENDPOINT: &str = "https://v4.echo.test/";

/// A prober that answers from a fixed url → body table
///
/// Unknown URLs get `ProbeResult::failed()`, the transport-failure value.
#[derive(Clone)]
pub struct ScriptedProber {
    responses: Arc<Mutex<HashMap<String, ProbeResult>>>,
    probed_urls: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            probed_urls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script a 200 response with the given body for `url`
    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), ProbeResult::new(200, body));
        self
    }

    /// Script a transport failure for `url`
    pub fn with_failure(self, url: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), ProbeResult::failed());
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// URLs probed, in call order
    pub fn probed_urls(&self) -> Vec<String> {
        self.probed_urls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AddressProber for ScriptedProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.probed_urls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(ProbeResult::failed)
    }
}

/// A resolver that returns fixed per-family answers and counts lookups
#[derive(Clone)]
pub struct ScriptedResolver {
    ipv6: Arc<Mutex<String>>,
    ipv4: Arc<Mutex<String>>,
    resolved_fqdns: Arc<Mutex<Vec<String>>>,
    v6_call_count: Arc<AtomicUsize>,
    v4_call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// A resolver for which nothing resolves (empty snapshots)
    pub fn empty() -> Self {
        Self {
            ipv6: Arc::new(Mutex::new(String::new())),
            ipv4: Arc::new(Mutex::new(String::new())),
            resolved_fqdns: Arc::new(Mutex::new(Vec::new())),
            v6_call_count: Arc::new(AtomicUsize::new(0)),
            v4_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_ipv6(self, address: &str) -> Self {
        *self.ipv6.lock().unwrap() = address.to_string();
        self
    }

    pub fn with_ipv4(self, address: &str) -> Self {
        *self.ipv4.lock().unwrap() = address.to_string();
        self
    }

    pub fn v6_call_count(&self) -> usize {
        self.v6_call_count.load(Ordering::SeqCst)
    }

    pub fn v4_call_count(&self) -> usize {
        self.v4_call_count.load(Ordering::SeqCst)
    }

    pub fn resolved_fqdns(&self) -> Vec<String> {
        self.resolved_fqdns.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NameResolver for ScriptedResolver {
    async fn resolve(&self, fqdn: &str, family: AddressFamily) -> String {
        self.resolved_fqdns.lock().unwrap().push(fqdn.to_string());
        match family {
            AddressFamily::V6 => {
                self.v6_call_count.fetch_add(1, Ordering::SeqCst);
                self.ipv6.lock().unwrap().clone()
            }
            AddressFamily::V4 => {
                self.v4_call_count.fetch_add(1, Ordering::SeqCst);
                self.ipv4.lock().unwrap().clone()
            }
        }
    }
}

/// A provider double that records submitted requests and answers with a
/// scripted body (`"OK"` by default)
#[derive(Clone)]
pub struct RecordingProvider {
    response_body: Arc<Mutex<String>>,
    fail_transport: Arc<Mutex<bool>>,
    submitted: Arc<Mutex<Vec<UpdateRequest>>>,
    submit_call_count: Arc<AtomicUsize>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            response_body: Arc::new(Mutex::new("OK".to_string())),
            fail_transport: Arc::new(Mutex::new(false)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            submit_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_response_body(self, body: &str) -> Self {
        *self.response_body.lock().unwrap() = body.to_string();
        self
    }

    /// Make `submit` return a transport error instead of an outcome
    pub fn with_transport_failure(self) -> Self {
        *self.fail_transport.lock().unwrap() = true;
        self
    }

    pub fn submit_call_count(&self) -> usize {
        self.submit_call_count.load(Ordering::SeqCst)
    }

    pub fn submitted_requests(&self) -> Vec<UpdateRequest> {
        self.submitted.lock().unwrap().clone()
    }

    /// The single submitted request, panicking unless exactly one was made
    pub fn sole_request(&self) -> UpdateRequest {
        let requests = self.submitted_requests();
        assert_eq!(requests.len(), 1, "expected exactly one update request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait::async_trait]
impl UpdateProvider for RecordingProvider {
    fn record_fqdn(&self, domain: &str) -> String {
        format!("{domain}.dyn.test")
    }

    async fn submit(
        &self,
        request: &UpdateRequest,
    ) -> Result<UpdateOutcome, dyndns_core::Error> {
        self.submit_call_count.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request.clone());
        if *self.fail_transport.lock().unwrap() {
            return Err(dyndns_core::Error::provider("recording", "connection reset"));
        }
        Ok(UpdateOutcome::new(
            200,
            self.response_body.lock().unwrap().clone(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Config with IPv4 tracking disabled
pub fn config_v6_only() -> Config {
    Config {
        domain: "myhost".to_string(),
        token: "test-token".to_string(),
        interval_secs: 60,
        ipv6_endpoint: V6_ENDPOINT.to_string(),
        ipv4_endpoint: None,
        event_channel_capacity: 16,
    }
}

/// Config with IPv4 tracking enabled
pub fn config_dual_stack() -> Config {
    Config {
        ipv4_endpoint: Some(V4_ENDPOINT.to_string()),
        ..config_v6_only()
    }
}

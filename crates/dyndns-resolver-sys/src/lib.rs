// # System Name Resolver
//
// This crate implements the `NameResolver` trait over the platform
// resolver (getaddrinfo via `tokio::net::lookup_host`).
//
// The reconciler only needs "what does the FQDN currently resolve to, for
// one family, as a string" — the first address of the requested family is
// rendered with `Display` and anything that fails yields an empty string.

use dyndns_core::traits::{AddressFamily, NameResolver};

/// Resolver backed by the operating system's resolver
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NameResolver for SystemResolver {
    async fn resolve(&self, fqdn: &str, family: AddressFamily) -> String {
        // lookup_host wants a port; 0 keeps it inert.
        let addrs = match tokio::net::lookup_host((fqdn, 0)).await {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(fqdn, %family, error = %e, "lookup failed");
                return String::new();
            }
        };

        let wanted = |addr: &std::net::SocketAddr| match family {
            AddressFamily::V4 => addr.is_ipv4(),
            AddressFamily::V6 => addr.is_ipv6(),
        };

        match addrs.into_iter().find(wanted) {
            Some(addr) => addr.ip().to_string(),
            None => {
                tracing::debug!(fqdn, %family, "no address of requested family");
                String::new()
            }
        }
    }
}

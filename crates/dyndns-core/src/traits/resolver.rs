// # Name Resolver Trait
//
// Defines the interface for resolving the tracked FQDN to its currently
// published address, one address family at a time.
//
// ## Implementations
//
// - System resolver: `dyndns-resolver-sys` crate

use async_trait::async_trait;

/// Address family to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Trait for name resolver implementations
///
/// Resolution is infallible by contract: an unresolvable name, a lookup
/// failure, or the absence of a record of the requested family all yield an
/// empty string. The `Reconciler` deliberately treats "no record" as
/// distinct from "record exists but differs" only through that empty value:
/// an empty snapshot compares unequal to any probed address and therefore
/// forces an update attempt.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `fqdn` for the given family.
    ///
    /// Returns the first address of that family rendered as a string, or
    /// an empty string if nothing resolved.
    async fn resolve(&self, fqdn: &str, family: AddressFamily) -> String;
}

//! Core traits for the dyndns daemon
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AddressProber`]: Fetch the caller's current public address from an echo endpoint
//! - [`NameResolver`]: Resolve the tracked FQDN for one address family
//! - [`UpdateProvider`]: Submit record updates to the dynamic-DNS API

pub mod prober;
pub mod resolver;
pub mod update_provider;

pub use prober::{AddressProber, ProbeResult};
pub use resolver::{AddressFamily, NameResolver};
pub use update_provider::{UpdateOutcome, UpdateProvider, UpdateRequest};

// # dyndns-core
//
// Core library for the dyndns reconciliation daemon.
//
// ## Architecture Overview
//
// The daemon keeps a single dynamic-DNS hostname in sync with the caller's
// current public addresses:
//
// - **AddressProber**: Trait for fetching the current public address from an
//   "IP echo" endpoint
// - **NameResolver**: Trait for resolving the tracked FQDN per address family
// - **UpdateProvider**: Trait for submitting an update to the dynamic-DNS API
// - **Reconciler**: Core loop that probes, resolves, compares, and updates
//   once per fixed interval
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from transport
// 2. **Cycle-Based**: One reconciliation cycle is a testable unit
//    (`Reconciler::run_cycle`) driven by an interval timer the loop owns
// 3. **Fail-Soft**: Probe, resolution, and provider failures degrade to
//    empty values and are retried on the next interval; nothing after
//    startup is fatal
// 4. **Library-First**: The daemon binary is a thin wiring layer

pub mod traits;
pub mod reconciler;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AddressProber, NameResolver, UpdateProvider};
pub use traits::{AddressFamily, ProbeResult, UpdateOutcome, UpdateRequest};
pub use reconciler::{ChangeDecision, CycleEvent, CycleResult, Reconciler};
pub use config::Config;
pub use error::{Error, Result};

//! quadfund node: the service layer around the allocation ledger.
//!
//! The node owns the single [`Registry`](quadfund_ledger::Registry) behind one
//! lock and is the only thing that touches it. Every state-changing call:
//! - checks the caller against the whitelist
//! - takes the write lock for the whole ledger operation
//! - records metrics and logs the outcome
//!
//! Distribution additionally drives the two payment transfers, fee first,
//! without holding the lock while they are in flight.

pub mod config;
pub mod error;
pub mod metrics;
pub mod node;
pub mod shutdown;

pub use config::{NodeConfig, PaymentsConfig, WhitelistConfig};
pub use error::{NodeError, TransferLeg};
pub use metrics::NodeMetrics;
pub use node::{DistributionOutcome, HealthReport, QuadfundNode};
pub use shutdown::ShutdownController;

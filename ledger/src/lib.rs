//! Quadratic credit-allocation ledger.
//!
//! Voters hold a budget of credits and place votes on proposals. Placing `n`
//! votes on one proposal costs `n²` credits, and every allocation a voter holds
//! draws on the same budget. The [`Registry`] owns the voter and proposal
//! collections and is the only place allocations change.
//!
//! Invariant: for every voter, `Σ votes² ≤ credits` after every mutation.
//!
//! The registry is a plain value with no interior locking. Callers that share
//! it between tasks wrap it in a single lock so the read-check-write of
//! [`Registry::allocate`] is never interleaved.

pub mod allocation;
pub mod cost;
pub mod distribution;
pub mod error;
pub mod proposal;
pub mod registry;
pub mod report;
pub mod voter;

pub use allocation::AllocationReceipt;
pub use cost::quadratic_cost;
pub use distribution::{DistributionPlan, FeeSplit, PendingDistribution};
pub use error::LedgerError;
pub use proposal::{Proposal, ProposalStatus};
pub use registry::{Registry, DEFAULT_CREDITS};
pub use report::{AllocationLine, ContributorLine, ProposalDetail, ProposalSummary, VoterStatus};
pub use voter::Voter;

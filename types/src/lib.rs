//! Fundamental types for quadfund.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! voter and proposal identifiers, wallet addresses, monetary amounts, credit/vote
//! scalars and timestamps.

pub mod address;
pub mod amount;
pub mod error;
pub mod id;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;
pub use id::{ProposalId, TxRef, VoterId};
pub use time::{Clock, SystemClock, Timestamp};

/// A voter's spendable budget. Quadratic costs are compared against it, so it
/// is wide enough to hold `u64::MAX²`.
pub type Credits = u128;

/// Vote magnitude a voter places on one proposal.
pub type Votes = u64;

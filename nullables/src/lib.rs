//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the service (clock, whitelist endpoint,
//! payment relayer) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod payments;
pub mod whitelist;

pub use clock::NullClock;
pub use payments::{NullPaymentGateway, RecordedTransfer};
pub use whitelist::NullWhitelistSource;

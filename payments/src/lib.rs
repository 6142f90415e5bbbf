//! Payment collaborator.
//!
//! Distribution needs exactly one capability from the outside world: move an
//! amount of the native currency to an address and wait until the transfer is
//! confirmed. Signing, gas and broadcasting belong to a relayer service; this
//! crate only talks to it.

pub mod error;
pub mod gateway;
pub mod relayer;

pub use error::PaymentError;
pub use gateway::PaymentGateway;
pub use relayer::HttpPaymentGateway;

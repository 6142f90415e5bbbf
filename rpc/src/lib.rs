//! HTTP/JSON API for the quadfund node.
//!
//! Provides endpoints for:
//! - Voter registration, credit top-ups and voter views
//! - Proposal creation, listing and detail
//! - Quadratic vote allocation
//! - Funding pool distribution
//! - Health and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};

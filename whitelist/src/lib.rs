//! Access whitelist.
//!
//! Every state-changing operation is gated on the caller's address being on a
//! remote allow-list. The list is fetched from an HTTP endpoint and cached:
//!
//! - Entries live for a TTL (5 minutes by default) and are refreshed lazily on
//!   the first lookup after expiry.
//! - If a refresh fails, the last good list keeps being served.
//! - If no fetch has ever succeeded, the list is empty and everyone is denied.
//!
//! Addresses are compared case-insensitively.

pub mod cache;
pub mod client;
pub mod error;
pub mod source;

pub use cache::{Whitelist, DEFAULT_TTL_SECS, FAILURE_BACKOFF_SECS};
pub use client::HttpWhitelistSource;
pub use error::WhitelistError;
pub use source::WhitelistSource;

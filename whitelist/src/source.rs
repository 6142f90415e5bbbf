//! The remote allow-list lookup, abstracted for testing.

use std::future::Future;

use crate::error::WhitelistError;

/// Fetches the complete allow-list from wherever it lives.
pub trait WhitelistSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<String>, WhitelistError>> + Send;
}

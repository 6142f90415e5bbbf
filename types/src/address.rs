//! Wallet address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// A wallet address as supplied by a caller.
///
/// Only non-emptiness is checked here; chain-specific format validation is the
/// payment collaborator's job. Comparison against allow-lists goes through
/// [`Address::normalized`], which is case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create an address from a raw string, trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for allow-list membership.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality.
    pub fn same_as(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

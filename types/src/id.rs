//! String identifiers for voters, proposals and external transfers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Unique voter identity (normally the voter's wallet address).
    VoterId
);

string_id!(
    /// Unique proposal identity.
    ProposalId
);

string_id!(
    /// Reference returned by the payment collaborator for a confirmed transfer.
    TxRef
);

impl ProposalId {
    /// Sequential identifier for the `n`th proposal created in a registry.
    pub fn sequential(n: u64) -> Self {
        Self(format!("prop-{n}"))
    }
}

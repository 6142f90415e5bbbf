use quadfund_ledger::LedgerError;
use quadfund_payments::PaymentError;
use quadfund_types::TypesError;
use std::fmt;
use thiserror::Error;

/// Which half of a distribution a transfer belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLeg {
    Fee,
    Payout,
}

impl fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferLeg::Fee => f.write_str("fee"),
            TransferLeg::Payout => f.write_str("payout"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("address {0} is not whitelisted")]
    Forbidden(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{leg} transfer failed: {source}")]
    Transfer {
        leg: TransferLeg,
        #[source]
        source: PaymentError,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl From<TypesError> for NodeError {
    fn from(e: TypesError) -> Self {
        NodeError::InvalidInput(e.to_string())
    }
}

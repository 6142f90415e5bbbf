use quadfund_types::{Credits, ProposalId, VoterId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("voter {0} not found")]
    VoterNotFound(VoterId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("voter {0} is already registered")]
    VoterExists(VoterId),

    #[error("proposal {0} is not active")]
    ProposalNotActive(ProposalId),

    #[error("insufficient credits: available {available}, required {required}")]
    InsufficientCredits { available: Credits, required: Credits },

    #[error("distribution of proposal {0} is already in progress")]
    DistributionInProgress(ProposalId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("arithmetic overflow in credit accounting")]
    Overflow,
}

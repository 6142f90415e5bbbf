use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("transfer request failed: {0}")]
    RequestFailed(String),

    #[error("relayer unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from relayer: {0}")]
    InvalidResponse(String),

    #[error("transfer {tx} was rejected: {reason}")]
    Rejected { tx: String, reason: String },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhitelistError {
    #[error("HTTP request to whitelist endpoint failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from whitelist endpoint: {0}")]
    InvalidResponse(String),

    #[error("whitelist endpoint unreachable: {0}")]
    Unreachable(String),
}

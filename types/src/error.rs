//! Errors raised while constructing or parsing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid amount {0:?}: {1}")]
    InvalidAmount(String, &'static str),

    #[error("amount {0:?} has more than {1} decimal places")]
    TooManyDecimals(String, u32),

    #[error("amount {0:?} does not fit in 128 bits of minor units")]
    AmountOverflow(String),

    #[error("address must not be empty")]
    EmptyAddress,
}

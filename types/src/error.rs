//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid 256-bit integer: {0}")]
    InvalidUint(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

//! Chain access errors.

use thiserror::Error;

/// Errors from the wallet provider or the node.
///
/// `UserRejected` and `Revert` are terminal outcomes of a submitted
/// operation; `Network` is the only variant callers may reasonably retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The node exposes no accounts to transact from.
    #[error("no wallet provider available")]
    NoProvider,

    /// The wallet holder declined to sign (JSON-RPC error code 4001).
    #[error("transaction rejected in the wallet")]
    UserRejected,

    /// The contract reverted, either at simulation time or on-chain
    /// (receipt status 0x0).
    #[error("execution reverted: {0}")]
    Revert(String),

    /// Any other structured JSON-RPC error from the node.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The node answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ChainError {
    /// Whether retrying the same operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

//! Chain access layer.
//!
//! One trait, [`ChainClient`], abstracts the connected account and node so
//! the lifecycle layer works identically against a live JSON-RPC node and
//! the in-memory test double.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::{ChainClient, Log, TxReceipt, TxRequest};
pub use error::ChainError;
pub use rpc::RpcChainClient;

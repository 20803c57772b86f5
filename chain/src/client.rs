//! The chain access trait and its wire-level request/receipt types.

use async_trait::async_trait;
use strive_types::{Address, TxHash, U256};

use crate::error::ChainError;

/// A transaction to submit through the connected account.
///
/// `to: None` is a contract deployment; `data` then carries the init code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Option<Address>,
    pub data: Vec<u8>,
    /// Native value to attach, in base units.
    pub value: Option<U256>,
    /// Explicit gas limit; the node estimates when absent.
    pub gas: Option<u64>,
}

impl TxRequest {
    pub fn call(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: Some(to),
            data,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn deploy(init_code: Vec<u8>) -> Self {
        Self {
            to: None,
            data: init_code,
            ..Self::default()
        }
    }
}

/// One event log entry from a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
}

/// A mined transaction receipt. Only produced for transactions that were
/// actually included; a failed simulation never gets this far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// Address of the contract created, for deployment transactions.
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

/// Access to one account on one chain.
///
/// Implementations are the real JSON-RPC client and the in-memory test
/// double; everything above this trait is oblivious to which one it holds.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The account all calls and transactions originate from.
    fn sender(&self) -> Address;

    /// Chain id reported by the node at connect time.
    fn chain_id(&self) -> u64;

    /// Read-only contract call (`eth_call`), returning the raw ABI frame.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError>;

    /// Submit a transaction and wait until it is mined.
    ///
    /// Returns `Err(Revert)` when the transaction was included but failed,
    /// and `Err(UserRejected)` when the wallet holder declined to sign.
    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError>;
}

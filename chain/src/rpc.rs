//! JSON-RPC chain client.
//!
//! Wraps `reqwest::Client` with the node's URL and the connected account,
//! and provides the two operations the rest of the stack needs: read-only
//! calls and submit-then-wait transactions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use strive_types::{Address, TxHash, U256};
use tracing::{debug, warn};

use crate::client::{ChainClient, Log, TxReceipt, TxRequest};
use crate::error::ChainError;

/// Wallet providers signal a user-declined signature with this code.
const CODE_USER_REJECTED: i64 = 4001;

const DEFAULT_RECEIPT_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_RECEIPT_ATTEMPTS: u32 = 60;

/// HTTP client for an Ethereum-compatible node.
#[derive(Clone)]
pub struct RpcChainClient {
    http: reqwest::Client,
    rpc_url: String,
    sender: Address,
    chain_id: u64,
    receipt_interval: Duration,
    receipt_attempts: u32,
}

impl RpcChainClient {
    /// Connect to a node, discovering the signing account and chain id.
    ///
    /// Fails with [`ChainError::NoProvider`] when the node exposes no
    /// accounts; every later call and transaction uses the first one.
    pub async fn connect(rpc_url: impl Into<String>) -> Result<Self, ChainError> {
        let rpc_url = rpc_url.into();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Network(format!("failed to create HTTP client: {e}")))?;

        let mut client = Self {
            http,
            rpc_url,
            sender: Address::ZERO,
            chain_id: 0,
            receipt_interval: DEFAULT_RECEIPT_INTERVAL,
            receipt_attempts: DEFAULT_RECEIPT_ATTEMPTS,
        };

        let accounts: Vec<String> = serde_json::from_value(
            client.rpc_call("eth_accounts", json!([])).await?,
        )
        .map_err(|e| ChainError::InvalidResponse(format!("invalid accounts list: {e}")))?;
        let first = accounts.first().ok_or(ChainError::NoProvider)?;
        client.sender = Address::from_hex(first)
            .map_err(|e| ChainError::InvalidResponse(format!("invalid account address: {e}")))?;

        let chain_id = client.rpc_call("eth_chainId", json!([])).await?;
        client.chain_id = parse_quantity(as_str(&chain_id, "chain id")?)?;

        debug!(url = %client.rpc_url, sender = %client.sender, chain_id = client.chain_id,
            "connected to node");
        Ok(client)
    }

    /// Override receipt polling cadence (interval between polls, max polls).
    pub fn with_receipt_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.receipt_interval = interval;
        self.receipt_attempts = attempts;
        self
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send one JSON-RPC request and return its `result` field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Network(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::Network(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let reply: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(error) = reply.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(map_rpc_error(code, message));
        }

        reply
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse("missing result field".into()))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        for _ in 0..self.receipt_attempts {
            let result = self
                .rpc_call("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
                .await?;
            if !result.is_null() {
                let raw: RawReceipt = serde_json::from_value(result)
                    .map_err(|e| ChainError::InvalidResponse(format!("invalid receipt: {e}")))?;
                return raw.into_receipt();
            }
            tokio::time::sleep(self.receipt_interval).await;
        }
        Err(ChainError::Network(format!(
            "timed out waiting for receipt of {tx_hash}"
        )))
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn sender(&self) -> Address {
        self.sender
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            {
                "from": self.sender.to_string(),
                "to": to.to_string(),
                "data": bytes_hex(&data),
            },
            "latest",
        ]);
        let result = self.rpc_call("eth_call", params).await?;
        parse_bytes(as_str(&result, "call result")?)
    }

    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        let mut object = serde_json::Map::new();
        object.insert("from".into(), json!(self.sender.to_string()));
        if let Some(to) = tx.to {
            object.insert("to".into(), json!(to.to_string()));
        }
        object.insert("data".into(), json!(bytes_hex(&tx.data)));
        if let Some(value) = tx.value {
            object.insert("value".into(), json!(quantity_hex(value)));
        }
        if let Some(gas) = tx.gas {
            object.insert("gas".into(), json!(quantity_hex(U256::from_u64(gas))));
        }

        let result = self
            .rpc_call("eth_sendTransaction", json!([object]))
            .await?;
        let tx_hash = TxHash::from_hex(as_str(&result, "transaction hash")?)
            .map_err(|e| ChainError::InvalidResponse(format!("invalid tx hash: {e}")))?;

        debug!(%tx_hash, "transaction submitted, waiting for receipt");
        self.wait_for_receipt(tx_hash).await
    }
}

/// Classify a structured JSON-RPC error.
fn map_rpc_error(code: i64, message: String) -> ChainError {
    if code == CODE_USER_REJECTED {
        return ChainError::UserRejected;
    }
    if message.to_ascii_lowercase().contains("revert") {
        return ChainError::Revert(message);
    }
    ChainError::Rpc { code, message }
}

fn as_str<'a>(value: &'a serde_json::Value, what: &str) -> Result<&'a str, ChainError> {
    value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("{what} is not a string")))
}

fn bytes_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Render a quantity as minimal 0x-hex, the way eth JSON-RPC wants it.
fn quantity_hex(value: U256) -> String {
    let hex = hex::encode(value.to_be_bytes());
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{trimmed}")
    }
}

fn parse_bytes(s: &str) -> Result<Vec<u8>, ChainError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::InvalidResponse(format!("missing 0x prefix: {s}")))?;
    hex::decode(digits).map_err(|e| ChainError::InvalidResponse(format!("invalid hex: {e}")))
}

fn parse_quantity(s: &str) -> Result<u64, ChainError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::InvalidResponse(format!("missing 0x prefix: {s}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("invalid quantity {s}: {e}")))
}

fn parse_topic(s: &str) -> Result<[u8; 32], ChainError> {
    let bytes = parse_bytes(s)?;
    bytes
        .try_into()
        .map_err(|_| ChainError::InvalidResponse(format!("topic is not 32 bytes: {s}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    status: String,
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    logs: Vec<RawLog>,
}

#[derive(Debug, Deserialize)]
struct RawLog {
    address: String,
    topics: Vec<String>,
    data: String,
}

impl RawReceipt {
    fn into_receipt(self) -> Result<TxReceipt, ChainError> {
        let tx_hash = TxHash::from_hex(&self.transaction_hash)
            .map_err(|e| ChainError::InvalidResponse(format!("invalid tx hash: {e}")))?;

        if parse_quantity(&self.status)? == 0 {
            warn!(%tx_hash, "transaction reverted on-chain");
            return Err(ChainError::Revert(format!(
                "transaction {tx_hash} reverted"
            )));
        }

        let contract_address = match self.contract_address {
            Some(s) => Some(
                Address::from_hex(&s).map_err(|e| {
                    ChainError::InvalidResponse(format!("invalid contract address: {e}"))
                })?,
            ),
            None => None,
        };

        let logs = self
            .logs
            .into_iter()
            .map(|raw| {
                Ok(Log {
                    address: Address::from_hex(&raw.address).map_err(|e| {
                        ChainError::InvalidResponse(format!("invalid log address: {e}"))
                    })?,
                    topics: raw
                        .topics
                        .iter()
                        .map(|t| parse_topic(t))
                        .collect::<Result<_, _>>()?,
                    data: parse_bytes(&raw.data)?,
                })
            })
            .collect::<Result<_, ChainError>>()?;

        Ok(TxReceipt {
            tx_hash,
            contract_address,
            logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_hex_is_minimal() {
        assert_eq!(quantity_hex(U256::ZERO), "0x0");
        assert_eq!(quantity_hex(U256::from_u64(1)), "0x1");
        assert_eq!(quantity_hex(U256::from_u64(0x5af3)), "0x5af3");
    }

    #[test]
    fn quantity_parse_roundtrip() {
        assert_eq!(parse_quantity("0x5afe").unwrap(), 0x5afe);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert!(parse_quantity("5afe").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn rpc_errors_are_classified() {
        assert_eq!(
            map_rpc_error(4001, "User denied transaction signature".into()),
            ChainError::UserRejected
        );
        assert!(matches!(
            map_rpc_error(3, "execution reverted: already joined".into()),
            ChainError::Revert(_)
        ));
        assert!(matches!(
            map_rpc_error(-32602, "invalid params".into()),
            ChainError::Rpc { code: -32602, .. }
        ));
    }

    #[test]
    fn receipt_with_zero_status_maps_to_revert() {
        let raw: RawReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "status": "0x0",
            "logs": [],
        }))
        .unwrap();
        assert!(matches!(raw.into_receipt(), Err(ChainError::Revert(_))));
    }

    #[test]
    fn receipt_logs_are_parsed() {
        let raw: RawReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("0x{}", "cd".repeat(32)),
            "status": "0x1",
            "contractAddress": "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2",
            "logs": [{
                "address": "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2",
                "topics": [format!("0x{}", "11".repeat(32))],
                "data": "0x00ff",
            }],
        }))
        .unwrap();
        let receipt = raw.into_receipt().unwrap();
        assert!(receipt.contract_address.is_some());
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].topics[0], [0x11u8; 32]);
        assert_eq!(receipt.logs[0].data, vec![0x00, 0xff]);
    }
}

//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which network the client targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Oasis Sapphire mainnet.
    Live,
    /// Oasis Sapphire testnet.
    Test,
    /// Local development node (Hardhat).
    Dev,
}

impl NetworkId {
    /// EVM chain id for this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Live => 23294,
            Self::Test => 23295,
            Self::Dev => 31337,
        }
    }

    /// Default JSON-RPC endpoint.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Live => "https://sapphire.oasis.io",
            Self::Test => "https://testnet.sapphire.oasis.io",
            Self::Dev => "http://127.0.0.1:8545",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Test => "test",
            Self::Dev => "dev",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_are_distinct() {
        assert_ne!(NetworkId::Live.chain_id(), NetworkId::Test.chain_id());
        assert_ne!(NetworkId::Test.chain_id(), NetworkId::Dev.chain_id());
    }
}

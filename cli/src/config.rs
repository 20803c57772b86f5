//! Client configuration: TOML file base, CLI flags and env vars on top.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use strive_abi::ChallengePlatform;
use strive_types::{Address, NetworkId};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub network: NetworkId,
    /// JSON-RPC endpoint; defaults to the network's public one.
    pub rpc_url: Option<String>,
    /// Platform contract address; defaults to the pinned deployment.
    pub platform_address: Option<String>,
    /// Secret vault contract address (vault subcommands only).
    pub vault_address: Option<String>,
    pub receipt_interval_secs: u64,
    pub receipt_attempts: u32,
    pub poll_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::Dev,
            rpc_url: None,
            platform_address: None,
            vault_address: None,
            receipt_interval_secs: 2,
            receipt_attempts: 60,
            poll_interval_secs: 5,
        }
    }
}

impl ClientConfig {
    /// Load a TOML config file; fall back to defaults when missing or
    /// malformed, the same lenient way the flags do.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ClientConfig>(&contents) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {}", path.display());
                    cfg
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {e}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.default_rpc_url().to_string())
    }

    pub fn receipt_interval(&self) -> Duration {
        Duration::from_secs(self.receipt_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Resolve the platform binding: explicit address override, else the
    /// pinned deployment for the configured network.
    pub fn platform(&self) -> anyhow::Result<ChallengePlatform> {
        if let Some(address) = &self.platform_address {
            let address = Address::from_hex(address)
                .with_context(|| format!("invalid platform address {address}"))?;
            return Ok(ChallengePlatform::new(address));
        }
        ChallengePlatform::deployed(self.network).with_context(|| {
            format!(
                "no pinned platform deployment on the {} network; pass --platform",
                self.network.as_str()
            )
        })
    }

    pub fn vault(&self) -> anyhow::Result<Address> {
        let address = self
            .vault_address
            .as_deref()
            .context("no vault address configured; pass --vault")?;
        Address::from_hex(address).with_context(|| format!("invalid vault address {address}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_dev() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.network, NetworkId::Dev);
        assert_eq!(cfg.rpc_url(), "http://127.0.0.1:8545");
        assert!(cfg.platform().is_err());
    }

    #[test]
    fn toml_overrides_defaults() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            network = "test"
            poll_interval_secs = 9
            vault_address = "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.network, NetworkId::Test);
        assert_eq!(cfg.poll_interval(), Duration::from_secs(9));
        assert!(cfg.vault().is_ok());
        // Pinned testnet deployment resolves without an override.
        assert!(cfg.platform().is_ok());
    }
}

//! strive — challenge platform command line client.

mod commands;
mod config;
mod vault;

use std::path::PathBuf;

use clap::Parser;
use strive_chain::{ChainClient, RpcChainClient};
use strive_lifecycle::LifecycleClient;
use strive_types::{Address, ChallengeId, NetworkId};

use crate::config::ClientConfig;
use crate::vault::SecretVault;

#[derive(Parser)]
#[command(name = "strive", about = "Challenge platform client")]
struct Cli {
    /// Network to target: "live", "test", or "dev".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, env = "STRIVE_NETWORK")]
    network: Option<String>,

    /// Node JSON-RPC URL (defaults to the network's public endpoint).
    #[arg(long, env = "STRIVE_RPC_URL")]
    rpc_url: Option<String>,

    /// Platform contract address (defaults to the pinned deployment).
    #[arg(long, env = "STRIVE_PLATFORM")]
    platform: Option<String>,

    /// Secret vault contract address.
    #[arg(long, env = "STRIVE_VAULT")]
    vault: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy the platform contract from a bytecode hex file.
    Deploy { bytecode: PathBuf },
    /// List all challenges.
    List,
    /// Create a challenge.
    Create {
        name: String,
        /// Window start, Unix seconds. Requires --end.
        #[arg(long, requires = "end")]
        start: Option<u64>,
        /// Window end, Unix seconds. Requires --start.
        #[arg(long, requires = "start")]
        end: Option<u64>,
    },
    /// Join a challenge, staking the contract's fixed amount.
    Join { id: u64 },
    /// Mark a participant as passed (creator only).
    Pass { id: u64, participant: String },
    /// Settle a challenge and distribute its pool (creator only).
    Settle { id: u64 },
    /// Claim this account's reward from a settled challenge.
    Claim { id: u64 },
    /// Show one challenge in detail.
    Status { id: u64 },
    /// Poll a challenge until it settles.
    Watch {
        id: u64,
        /// Seconds between polls.
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Secret vault maintenance.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

#[derive(clap::Subcommand)]
enum VaultAction {
    /// Store a secret that reveals after `longevity` seconds of inactivity.
    Create {
        name: String,
        longevity: u64,
        secret: String,
    },
    /// Reveal an expired secret by index.
    Reveal { index: u64 },
    /// List secret metadata.
    List {
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 20)]
        count: u64,
    },
    /// Reset the inactivity timer on all of this account's secrets.
    Refresh,
}

fn parse_network(s: &str) -> NetworkId {
    match s.to_lowercase().as_str() {
        "live" => NetworkId::Live,
        "test" => NetworkId::Test,
        _ => NetworkId::Dev,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    strive_utils::init_tracing();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path),
        None => ClientConfig::default(),
    };
    if let Some(network) = cli.network.as_deref() {
        config.network = parse_network(network);
    }
    if cli.rpc_url.is_some() {
        config.rpc_url = cli.rpc_url;
    }
    if cli.platform.is_some() {
        config.platform_address = cli.platform;
    }
    if cli.vault.is_some() {
        config.vault_address = cli.vault;
    }

    let chain = RpcChainClient::connect(config.rpc_url())
        .await?
        .with_receipt_polling(config.receipt_interval(), config.receipt_attempts);
    if chain.chain_id() != config.network.chain_id() {
        tracing::warn!(
            "node reports chain id {} but the {} network expects {}",
            chain.chain_id(),
            config.network.as_str(),
            config.network.chain_id()
        );
    }
    tracing::info!(
        "connected to {} as {}",
        config.rpc_url(),
        chain.sender().short()
    );

    match cli.command {
        Command::Deploy { bytecode } => commands::deploy(&chain, &bytecode).await,
        Command::Vault { action } => {
            let vault = SecretVault::new(config.vault()?);
            match action {
                VaultAction::Create {
                    name,
                    longevity,
                    secret,
                } => commands::vault_create(&chain, &vault, &name, longevity, secret.as_bytes())
                    .await,
                VaultAction::Reveal { index } => {
                    commands::vault_reveal(&chain, &vault, index).await
                }
                VaultAction::List { offset, count } => {
                    commands::vault_list(&chain, &vault, offset, count).await
                }
                VaultAction::Refresh => commands::vault_refresh(&chain, &vault).await,
            }
        }
        command => {
            let mut client = LifecycleClient::connect(chain, config.platform()?).await?;
            match command {
                Command::List => {
                    commands::list(&client);
                    Ok(())
                }
                Command::Create { name, start, end } => {
                    commands::create(&mut client, &name, start.zip(end)).await
                }
                Command::Join { id } => commands::join(&mut client, ChallengeId::new(id)).await,
                Command::Pass { id, participant } => {
                    let participant: Address = participant.parse()?;
                    commands::pass(&mut client, ChallengeId::new(id), participant).await
                }
                Command::Settle { id } => {
                    commands::settle(&mut client, ChallengeId::new(id)).await
                }
                Command::Claim { id } => commands::claim(&mut client, ChallengeId::new(id)).await,
                Command::Status { id } => {
                    commands::status(&mut client, ChallengeId::new(id)).await
                }
                Command::Watch { id, interval } => {
                    let interval = interval
                        .map(std::time::Duration::from_secs)
                        .unwrap_or(config.poll_interval());
                    commands::watch(client, ChallengeId::new(id), interval).await
                }
                Command::Deploy { .. } | Command::Vault { .. } => unreachable!(),
            }
        }
    }
}

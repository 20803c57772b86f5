//! Command implementations.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use strive_chain::{ChainClient, TxRequest};
use strive_lifecycle::view::status_line;
use strive_lifecycle::{LifecycleClient, SharedLifecycleClient};
use strive_types::{Address, ChallengeId, Timestamp};
use strive_utils::format_duration;

use crate::vault::SecretVault;

/// Submit contract-creation bytecode read from a hex file and print the
/// deployed address.
pub async fn deploy(chain: &impl ChainClient, bytecode: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(bytecode)
        .with_context(|| format!("reading bytecode file {}", bytecode.display()))?;
    let code = hex::decode(text.trim().trim_start_matches("0x"))
        .context("bytecode file is not hex")?;
    let receipt = chain.submit(TxRequest::deploy(code)).await?;
    let address = receipt
        .contract_address
        .context("receipt carries no contract address")?;
    println!("deployed at {address} (tx {})", receipt.tx_hash);
    Ok(())
}

pub fn list<C: ChainClient>(client: &LifecycleClient<C>) {
    if client.challenges().is_empty() {
        println!("no challenges");
        return;
    }
    let now = Timestamp::now();
    for view in client.challenges() {
        println!("{}", status_line(view, now));
    }
}

pub async fn create<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    name: &str,
    window: Option<(u64, u64)>,
) -> anyhow::Result<()> {
    let window = window.map(|(s, e)| (Timestamp::new(s), Timestamp::new(e)));
    let id = client.create(name, window).await?;
    println!("created challenge {id}");
    Ok(())
}

pub async fn join<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    id: ChallengeId,
) -> anyhow::Result<()> {
    let stake = client.stake();
    client.join(id).await?;
    println!("joined {id}, staked {stake}");
    Ok(())
}

pub async fn pass<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    id: ChallengeId,
    participant: Address,
) -> anyhow::Result<()> {
    client.mark_passed(id, participant).await?;
    println!("marked {} passed on {id}", participant.short());
    Ok(())
}

pub async fn settle<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    id: ChallengeId,
) -> anyhow::Result<()> {
    client.settle(id).await?;
    let view = client.challenge(id).context("challenge vanished after settle")?;
    println!("settled {id}; remaining pool {}", view.challenge.pool);
    Ok(())
}

pub async fn claim<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    id: ChallengeId,
) -> anyhow::Result<()> {
    let amount = client.claim(id).await?;
    println!("claimed {amount} from {id}");
    Ok(())
}

pub async fn status<C: ChainClient>(
    client: &mut LifecycleClient<C>,
    id: ChallengeId,
) -> anyhow::Result<()> {
    client.refresh(Some(id)).await?;
    let view = client.challenge(id).context("unknown challenge")?;
    let now = Timestamp::now();
    println!("{}", status_line(view, now));
    let p = view.participation;
    println!(
        "  joined: {}  passed: {}  claimed: {}",
        p.has_joined, p.has_passed, p.has_claimed
    );
    if let Some((start, end)) = view.challenge.window {
        println!(
            "  window: {} → {} ({} long)",
            start.as_secs(),
            end.as_secs(),
            format_duration(start.elapsed_since(end))
        );
    }
    if !view.claimable.is_zero() {
        println!("  claimable: {}", view.claimable);
    }
    Ok(())
}

/// Poll a challenge until it settles, printing each observed change.
pub async fn watch<C: ChainClient + 'static>(
    client: LifecycleClient<C>,
    id: ChallengeId,
    interval: Duration,
) -> anyhow::Result<()> {
    anyhow::ensure!(client.challenge(id).is_some(), "unknown challenge {id}");
    let mut rx = client.subscribe();
    let shared = SharedLifecycleClient::new(client);
    let poller = shared.watch_until_settled(id, interval);

    let printer = tokio::spawn(async move {
        let mut last = None;
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if let Some(view) = snapshot.challenge(id) {
                let line = status_line(view, Timestamp::now());
                if last.as_deref() != Some(line.as_str()) {
                    println!("{line}");
                    last = Some(line);
                }
            }
        }
    });

    poller.join().await;
    println!("challenge {id} settled");
    drop(shared);
    let _ = printer.await;
    Ok(())
}

// ── Vault maintenance ───────────────────────────────────────────────────

pub async fn vault_create(
    chain: &impl ChainClient,
    vault: &SecretVault,
    name: &str,
    longevity: u64,
    secret: &[u8],
) -> anyhow::Result<()> {
    let data = vault.create_secret(name, longevity, secret);
    let receipt = chain.submit(TxRequest::call(vault.address(), data)).await?;
    println!(
        "stored secret \"{name}\" (reveals after {} idle, tx {})",
        format_duration(longevity),
        receipt.tx_hash
    );
    Ok(())
}

pub async fn vault_reveal(
    chain: &impl ChainClient,
    vault: &SecretVault,
    index: u64,
) -> anyhow::Result<()> {
    let data = chain.call(vault.address(), vault.reveal_secret(index)).await?;
    let secret = SecretVault::decode_secret(&data)?;
    match std::str::from_utf8(&secret) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("0x{}", hex::encode(&secret)),
    }
    Ok(())
}

pub async fn vault_list(
    chain: &impl ChainClient,
    vault: &SecretVault,
    offset: u64,
    count: u64,
) -> anyhow::Result<()> {
    let data = chain.call(vault.address(), vault.get_metas(offset, count)).await?;
    let metas = SecretVault::decode_metas(&data)?;
    if metas.is_empty() {
        println!("no secrets");
        return Ok(());
    }
    for (i, meta) in metas.iter().enumerate() {
        println!(
            "#{}  {}  by {}  longevity {}",
            offset + i as u64,
            meta.name,
            meta.creator.short(),
            format_duration(meta.longevity)
        );
    }
    Ok(())
}

pub async fn vault_refresh(chain: &impl ChainClient, vault: &SecretVault) -> anyhow::Result<()> {
    let receipt = chain
        .submit(TxRequest::call(vault.address(), vault.refresh_secrets()))
        .await?;
    println!("refreshed secrets (tx {})", receipt.tx_hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strive_abi::ChallengePlatform;
    use strive_nullables::NullChain;
    use strive_types::StakeAmount;

    async fn client(chain: NullChain) -> LifecycleClient<NullChain> {
        LifecycleClient::connect(chain, ChallengePlatform::new(NullChain::PLATFORM))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_join_settle_through_the_command_layer() {
        let chain = NullChain::new(StakeAmount::from_tokens(2));
        let mut c = client(chain).await;

        create(&mut c, "cli flow", None).await.unwrap();
        let id = c.challenges()[0].challenge.id;
        join(&mut c, id).await.unwrap();
        settle(&mut c, id).await.unwrap();
        assert!(c.challenge(id).unwrap().challenge.is_settled);
    }

    #[tokio::test]
    async fn watch_returns_once_settled() {
        let chain = NullChain::new(StakeAmount::from_tokens(1));
        let settler_chain = chain.for_sender(chain.sender());
        let mut c = client(chain).await;
        let id = c.create("watched", None).await.unwrap();

        let handle = tokio::spawn(watch(c, id, Duration::from_millis(1)));

        let mut settler = client(settler_chain).await;
        settler.settle(id).await.unwrap();

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn deploy_reports_the_minted_address() {
        let chain = NullChain::new(StakeAmount::from_tokens(1));
        let dir = std::env::temp_dir().join("strive-deploy-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bytecode.hex");
        std::fs::write(&path, "0x6080604052").unwrap();

        deploy(&chain, &path).await.unwrap();
    }
}

//! The lifecycle client: owned cached state plus guarded operations.
//!
//! One instance drives one account against one deployed platform contract.
//! All state lives in the instance; observers subscribe to the snapshot
//! channel instead of reaching into it.

use std::collections::HashSet;

use strive_abi::event::decode_event;
use strive_abi::{ChallengePlatform, PlatformEvent};
use strive_chain::{ChainClient, TxReceipt, TxRequest};
use strive_types::{
    Address, Challenge, ChallengeId, Participation, StakeAmount, Standing, Timestamp,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::LifecycleError;
use crate::state::{ChallengeView, InFlightKey, OpKind, Snapshot};

/// Lifecycle driver for the challenge platform.
pub struct LifecycleClient<C> {
    chain: C,
    binding: ChallengePlatform,
    account: Address,
    stake: StakeAmount,
    challenges: Vec<ChallengeView>,
    in_flight: HashSet<InFlightKey>,
    last_error: Option<LifecycleError>,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl<C: ChainClient> LifecycleClient<C> {
    /// Connect to the platform: read the fixed join stake and the current
    /// challenge list, then publish the first snapshot.
    pub async fn connect(chain: C, binding: ChallengePlatform) -> Result<Self, LifecycleError> {
        let account = chain.sender();
        let data = chain
            .call(binding.address(), binding.stake_amount())
            .await?;
        let stake = ChallengePlatform::decode_stake(&data)?;

        let (snapshot_tx, _) = watch::channel(Snapshot {
            account,
            stake,
            challenges: Vec::new(),
            in_flight: Vec::new(),
            last_error: None,
        });
        let mut client = Self {
            chain,
            binding,
            account,
            stake,
            challenges: Vec::new(),
            in_flight: HashSet::new(),
            last_error: None,
            snapshot_tx,
        };
        client.refresh_inner(None).await?;
        client.publish();
        info!(%account, stake = %stake, "lifecycle client connected");
        Ok(client)
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// The contract's fixed join stake.
    pub fn stake(&self) -> StakeAmount {
        self.stake
    }

    pub fn challenges(&self) -> &[ChallengeView] {
        &self.challenges
    }

    pub fn challenge(&self, id: ChallengeId) -> Option<&ChallengeView> {
        self.challenges.iter().find(|v| v.challenge.id == id)
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut in_flight: Vec<InFlightKey> = self.in_flight.iter().copied().collect();
        in_flight.sort();
        Snapshot {
            account: self.account,
            stake: self.stake,
            challenges: self.challenges.clone(),
            in_flight,
            last_error: self.last_error.clone(),
        }
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Create a challenge. Returns the contract-assigned id.
    pub async fn create(
        &mut self,
        name: &str,
        window: Option<(Timestamp, Timestamp)>,
    ) -> Result<ChallengeId, LifecycleError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return self.reject(LifecycleError::EmptyName);
        }
        if let Some((start, end)) = window {
            if end <= start {
                return self.reject(LifecycleError::InvalidWindow);
            }
        }
        self.begin(InFlightKey::Create)?;
        let result = self.submit_create(&name, window).await;
        self.finish(InFlightKey::Create, result)
    }

    async fn submit_create(
        &mut self,
        name: &str,
        window: Option<(Timestamp, Timestamp)>,
    ) -> Result<ChallengeId, LifecycleError> {
        let data = self.binding.create_challenge(name, window);
        let receipt = self
            .chain
            .submit(TxRequest::call(self.binding.address(), data))
            .await?;
        let id = find_event(&receipt, |event| match event {
            PlatformEvent::Created { id, .. } => Some(id),
            _ => None,
        })?;
        debug!(%id, name, "challenge created");
        self.refresh_inner(Some(id)).await?;
        Ok(id)
    }

    /// Join a challenge, attaching the fixed stake to the transaction.
    pub async fn join(&mut self, id: ChallengeId) -> Result<(), LifecycleError> {
        let view = self.require(id)?;
        if view.challenge.is_settled {
            return self.reject(LifecycleError::AlreadySettled(id));
        }
        if view.participation.has_joined {
            return self.reject(LifecycleError::AlreadyJoined(id));
        }
        self.begin(InFlightKey::Op(id, OpKind::Join))?;
        let result = self.submit_join(id).await;
        self.finish(InFlightKey::Op(id, OpKind::Join), result)
    }

    async fn submit_join(&mut self, id: ChallengeId) -> Result<(), LifecycleError> {
        // The cache can lag another session on the same account, so confirm
        // against the contract before staking.
        if self.read_flag(self.binding.has_joined(id, self.account)).await? {
            return Err(LifecycleError::AlreadyJoined(id));
        }
        let tx = TxRequest::call(self.binding.address(), self.binding.join_challenge(id))
            .with_value(self.stake.raw());
        self.chain.submit(tx).await?;
        debug!(%id, stake = %self.stake, "joined challenge");
        self.refresh_inner(Some(id)).await
    }

    /// Mark a participant as having passed. Creator only.
    pub async fn mark_passed(
        &mut self,
        id: ChallengeId,
        participant: Address,
    ) -> Result<(), LifecycleError> {
        let view = self.require(id)?;
        if view.challenge.creator != self.account {
            return self.reject(LifecycleError::NotCreator(id));
        }
        if view.challenge.is_settled {
            return self.reject(LifecycleError::AlreadySettled(id));
        }
        self.begin(InFlightKey::Op(id, OpKind::MarkPassed))?;
        let result = self.submit_mark_passed(id, participant).await;
        self.finish(InFlightKey::Op(id, OpKind::MarkPassed), result)
    }

    async fn submit_mark_passed(
        &mut self,
        id: ChallengeId,
        participant: Address,
    ) -> Result<(), LifecycleError> {
        // Fresh reads: the cache only tracks the connected account's flags.
        if !self
            .read_flag(self.binding.has_joined(id, participant))
            .await?
        {
            return Err(LifecycleError::NotAParticipant(id));
        }
        if self
            .read_flag(self.binding.has_passed(id, participant))
            .await?
        {
            // Re-marking would waste gas on a guaranteed revert.
            return Err(LifecycleError::AlreadyPassed(id));
        }
        let data = self.binding.mark_challenge_passed(id, participant);
        self.chain
            .submit(TxRequest::call(self.binding.address(), data))
            .await?;
        debug!(%id, %participant, "participant marked passed");
        self.refresh_inner(Some(id)).await
    }

    /// Settle a challenge, distributing the pool. Creator only, once.
    pub async fn settle(&mut self, id: ChallengeId) -> Result<(), LifecycleError> {
        let view = self.require(id)?;
        if view.challenge.creator != self.account {
            return self.reject(LifecycleError::NotCreator(id));
        }
        if view.challenge.is_settled {
            return self.reject(LifecycleError::AlreadySettled(id));
        }
        self.begin(InFlightKey::Op(id, OpKind::Settle))?;
        let result = self.submit_settle(id).await;
        self.finish(InFlightKey::Op(id, OpKind::Settle), result)
    }

    async fn submit_settle(&mut self, id: ChallengeId) -> Result<(), LifecycleError> {
        let data = self.binding.settle_challenge(id);
        let receipt = self
            .chain
            .submit(TxRequest::call(self.binding.address(), data))
            .await?;
        let prize = find_event(&receipt, |event| match event {
            PlatformEvent::Settled {
                prize_per_winner, ..
            } => Some(prize_per_winner),
            _ => None,
        })?;
        info!(%id, prize = %prize, "challenge settled");
        self.refresh_inner(Some(id)).await
    }

    /// Claim this account's reward. Returns the amount actually paid out.
    pub async fn claim(&mut self, id: ChallengeId) -> Result<StakeAmount, LifecycleError> {
        let view = self.require(id)?;
        if view.participation.has_claimed {
            return self.reject(LifecycleError::AlreadyClaimed(id));
        }
        if !view.standing.can_claim() {
            return self.reject(LifecycleError::NotEligible(id));
        }
        self.begin(InFlightKey::Op(id, OpKind::Claim))?;
        let result = self.submit_claim(id).await;
        self.finish(InFlightKey::Op(id, OpKind::Claim), result)
    }

    async fn submit_claim(&mut self, id: ChallengeId) -> Result<StakeAmount, LifecycleError> {
        let data = self.binding.claim_rewards(id);
        let receipt = self
            .chain
            .submit(TxRequest::call(self.binding.address(), data))
            .await?;
        let account = self.account;
        let amount = find_event(&receipt, |event| match event {
            PlatformEvent::Claimed {
                participant,
                amount,
                ..
            } if participant == account => Some(amount),
            _ => None,
        })?;
        info!(%id, amount = %amount, "reward claimed");
        self.refresh_inner(Some(id)).await?;
        Ok(amount)
    }

    /// Re-read state from the contract. `None` replaces the whole cached
    /// list; `Some(id)` re-reads just that challenge.
    pub async fn refresh(&mut self, scope: Option<ChallengeId>) -> Result<(), LifecycleError> {
        let result = self.refresh_inner(scope).await;
        if let Err(err) = &result {
            warn!(error = %err, "refresh failed");
            self.last_error = Some(err.clone());
        }
        self.publish();
        result
    }

    async fn refresh_inner(&mut self, scope: Option<ChallengeId>) -> Result<(), LifecycleError> {
        match scope {
            None => {
                let data = self
                    .chain
                    .call(self.binding.address(), self.binding.get_all_challenges())
                    .await?;
                let challenges = ChallengePlatform::decode_challenges(&data)?;
                let mut views = Vec::with_capacity(challenges.len());
                for challenge in challenges {
                    views.push(self.load_view(challenge).await?);
                }
                // Replaced wholesale, never merged.
                self.challenges = views;
            }
            Some(id) => {
                let data = self
                    .chain
                    .call(self.binding.address(), self.binding.get_challenge_by_id(id))
                    .await?;
                let view = self.load_view(ChallengePlatform::decode_challenge(&data)?).await?;
                // Linear scan; the contract does not promise id ordering
                // and the list is small.
                match self.challenges.iter().position(|v| v.challenge.id == id) {
                    Some(i) => self.challenges[i] = view,
                    None => self.challenges.push(view),
                }
            }
        }
        Ok(())
    }

    async fn load_view(&self, challenge: Challenge) -> Result<ChallengeView, LifecycleError> {
        let id = challenge.id;
        let participation = Participation {
            has_joined: self.read_flag(self.binding.has_joined(id, self.account)).await?,
            has_passed: self.read_flag(self.binding.has_passed(id, self.account)).await?,
            has_claimed: self.read_flag(self.binding.has_claimed(id, self.account)).await?,
        };
        let standing = Standing::derive(participation, challenge.is_settled);
        let claimable = if standing.can_claim() {
            let data = self
                .chain
                .call(
                    self.binding.address(),
                    self.binding.claimable_reward(id, self.account),
                )
                .await?;
            ChallengePlatform::decode_stake(&data)?
        } else {
            StakeAmount::ZERO
        };
        Ok(ChallengeView {
            challenge,
            participation,
            standing,
            claimable,
        })
    }

    async fn read_flag(&self, data: Vec<u8>) -> Result<bool, LifecycleError> {
        let response = self.chain.call(self.binding.address(), data).await?;
        Ok(ChallengePlatform::decode_bool(&response)?)
    }

    // ── Guard plumbing ──────────────────────────────────────────────────

    fn require(&self, id: ChallengeId) -> Result<ChallengeView, LifecycleError> {
        self.challenge(id)
            .cloned()
            .ok_or(LifecycleError::UnknownChallenge(id))
    }

    fn begin(&mut self, key: InFlightKey) -> Result<(), LifecycleError> {
        if !self.in_flight.insert(key) {
            let err = LifecycleError::Busy(key.kind());
            self.last_error = Some(err.clone());
            self.publish();
            return Err(err);
        }
        self.publish();
        Ok(())
    }

    fn finish<T>(
        &mut self,
        key: InFlightKey,
        result: Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        self.in_flight.remove(&key);
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.clone()),
        }
        self.publish();
        result
    }

    fn reject<T>(&mut self, err: LifecycleError) -> Result<T, LifecycleError> {
        self.last_error = Some(err.clone());
        self.publish();
        Err(err)
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

fn find_event<T>(
    receipt: &TxReceipt,
    mut pick: impl FnMut(PlatformEvent) -> Option<T>,
) -> Result<T, LifecycleError> {
    for log in &receipt.logs {
        if let Some(event) = decode_event(&log.topics, &log.data)? {
            if let Some(value) = pick(event) {
                return Ok(value);
            }
        }
    }
    Err(LifecycleError::MissingEvent)
}

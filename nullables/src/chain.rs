//! Nullable chain — an in-memory ChainClient that executes the challenge
//! platform contract's semantics.
//!
//! Calldata is decoded with the real codec and dispatched on the real
//! selectors, so everything above the [`ChainClient`] trait runs unmodified.
//! Reverts use the same shapes the deployed contract produces, and mined
//! transactions emit the same event logs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strive_abi::binding::{
    SIG_CLAIMABLE_REWARD, SIG_CLAIM_REWARDS, SIG_CREATE_CHALLENGE, SIG_GET_ALL_CHALLENGES,
    SIG_GET_CHALLENGE_BY_ID, SIG_GET_CHALLENGE_STATE, SIG_HAS_CLAIMED, SIG_HAS_JOINED,
    SIG_HAS_PASSED, SIG_JOIN_CHALLENGE, SIG_MARK_PASSED, SIG_SETTLE_CHALLENGE, SIG_STAKE_AMOUNT,
    challenge_to_token,
};
use strive_abi::event::{
    address_topic, uint_topic, SIG_CHALLENGE_CREATED, SIG_CHALLENGE_JOINED, SIG_CHALLENGE_PASSED,
    SIG_CHALLENGE_SETTLED, SIG_REWARD_CLAIMED,
};
use strive_abi::{decode, encode, event_topic, selector, ParamType, Token};
use strive_chain::{ChainClient, ChainError, Log, TxReceipt, TxRequest};
use strive_types::{
    Address, Challenge, ChallengeId, ChallengePhase, Participation, StakeAmount, Timestamp,
    TxHash, U256,
};

use crate::clock::NullClock;

/// A deterministic test account: 20 copies of one byte.
pub fn account(byte: u8) -> Address {
    Address::new([byte; 20])
}

#[derive(Clone, Debug)]
struct Record {
    challenge: Challenge,
    flags: BTreeMap<Address, Participation>,
    payouts: BTreeMap<Address, StakeAmount>,
}

#[derive(Debug)]
struct ContractState {
    stake: StakeAmount,
    next_id: u64,
    tx_counter: u64,
    challenges: BTreeMap<u64, Record>,
}

#[derive(Debug, Default)]
struct Switches {
    reject_next: bool,
    fail_network: bool,
}

/// An in-memory chain hosting one challenge platform contract.
///
/// Clones made with [`NullChain::for_sender`] share contract state, so tests
/// can act as several accounts against the same contract.
pub struct NullChain {
    sender: Address,
    chain_id: u64,
    platform: Address,
    clock: Arc<NullClock>,
    state: Arc<Mutex<ContractState>>,
    switches: Arc<Mutex<Switches>>,
}

impl NullChain {
    /// Platform contract address on the null chain.
    pub const PLATFORM: Address = Address::new([0xccu8; 20]);

    pub fn new(stake: StakeAmount) -> Self {
        Self {
            sender: account(0x01),
            chain_id: 31337,
            platform: Self::PLATFORM,
            clock: Arc::new(NullClock::new(1_000_000)),
            state: Arc::new(Mutex::new(ContractState {
                stake,
                next_id: 1,
                tx_counter: 0,
                challenges: BTreeMap::new(),
            })),
            switches: Arc::new(Mutex::new(Switches::default())),
        }
    }

    /// Another handle on the same chain, transacting as `sender`.
    pub fn for_sender(&self, sender: Address) -> Self {
        Self {
            sender,
            chain_id: self.chain_id,
            platform: self.platform,
            clock: Arc::clone(&self.clock),
            state: Arc::clone(&self.state),
            switches: Arc::clone(&self.switches),
        }
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    /// Make the wallet decline the next transaction.
    pub fn reject_next(&self) {
        self.switches.lock().unwrap().reject_next = true;
    }

    /// Fail every request with a network error until turned off again.
    pub fn fail_network(&self, fail: bool) {
        self.switches.lock().unwrap().fail_network = fail;
    }

    /// Direct state inspection for assertions.
    pub fn challenge(&self, id: ChallengeId) -> Option<Challenge> {
        let state = self.state.lock().unwrap();
        state.challenges.get(&id.raw()).map(|r| r.challenge.clone())
    }

    pub fn participation(&self, id: ChallengeId, who: Address) -> Participation {
        let state = self.state.lock().unwrap();
        state
            .challenges
            .get(&id.raw())
            .and_then(|r| r.flags.get(&who).copied())
            .unwrap_or(Participation::NONE)
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn check_network(&self) -> Result<(), ChainError> {
        if self.switches.lock().unwrap().fail_network {
            return Err(ChainError::Network("connection refused".into()));
        }
        Ok(())
    }

    fn next_tx_hash(state: &mut ContractState) -> TxHash {
        state.tx_counter += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&state.tx_counter.to_be_bytes());
        TxHash::new(bytes)
    }

    // ── Transaction dispatch ────────────────────────────────────────────

    fn execute(&self, tx: &TxRequest) -> Result<Vec<Log>, ChainError> {
        let (sel, args) = split_calldata(&tx.data)?;
        if sel == selector(SIG_CREATE_CHALLENGE) {
            self.create(args)
        } else if sel == selector(SIG_JOIN_CHALLENGE) {
            self.join(args, tx.value)
        } else if sel == selector(SIG_MARK_PASSED) {
            self.mark_passed(args)
        } else if sel == selector(SIG_SETTLE_CHALLENGE) {
            self.settle(args)
        } else if sel == selector(SIG_CLAIM_REWARDS) {
            self.claim(args)
        } else {
            Err(revert("unknown function"))
        }
    }

    fn create(&self, args: &[u8]) -> Result<Vec<Log>, ChainError> {
        let mut values = decode_args(&[ParamType::String, ParamType::Uint, ParamType::Uint], args)?;
        let name = take(&mut values).into_string().map_err(bad_args)?;
        let start = take(&mut values).into_u64().map_err(bad_args)?;
        let end = take(&mut values).into_u64().map_err(bad_args)?;

        if name.trim().is_empty() {
            return Err(revert("name required"));
        }
        let window = match (start, end) {
            (0, 0) => None,
            (s, e) if e > s => Some((Timestamp::new(s), Timestamp::new(e))),
            _ => return Err(revert("invalid window")),
        };

        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.challenges.insert(
            id,
            Record {
                challenge: Challenge {
                    id: ChallengeId::new(id),
                    name: name.clone(),
                    creator: self.sender,
                    window,
                    pool: StakeAmount::ZERO,
                    player_count: 0,
                    is_settled: false,
                },
                flags: BTreeMap::new(),
                payouts: BTreeMap::new(),
            },
        );

        Ok(vec![self.log(
            vec![
                event_topic(SIG_CHALLENGE_CREATED),
                uint_topic(id),
                address_topic(self.sender),
            ],
            encode(&[Token::String(name)]),
        )])
    }

    fn join(&self, args: &[u8], value: Option<U256>) -> Result<Vec<Log>, ChainError> {
        let id = decode_id(args)?;
        let now = self.now();
        let mut state = self.state.lock().unwrap();
        let stake = state.stake;
        let record = state
            .challenges
            .get_mut(&id.raw())
            .ok_or_else(|| revert("unknown challenge"))?;

        if value.unwrap_or(U256::ZERO) != stake.raw() {
            return Err(revert("stake mismatch"));
        }
        match record.challenge.phase(now) {
            ChallengePhase::Active => {}
            ChallengePhase::Pending => return Err(revert("challenge not started")),
            ChallengePhase::Ended => return Err(revert("challenge ended")),
            ChallengePhase::Settled => return Err(revert("challenge settled")),
        }
        let flags = record.flags.entry(self.sender).or_default();
        if flags.has_joined {
            return Err(revert("already joined"));
        }
        flags.has_joined = true;
        record.challenge.pool = record
            .challenge
            .pool
            .checked_add(stake)
            .ok_or_else(|| revert("pool overflow"))?;
        record.challenge.player_count += 1;

        Ok(vec![self.log(
            vec![
                event_topic(SIG_CHALLENGE_JOINED),
                uint_topic(id.raw()),
                address_topic(self.sender),
            ],
            encode(&[Token::Uint(stake.raw())]),
        )])
    }

    fn mark_passed(&self, args: &[u8]) -> Result<Vec<Log>, ChainError> {
        let mut values = decode_args(&[ParamType::Uint, ParamType::Address], args)?;
        let id = take(&mut values).into_u64().map_err(bad_args)?;
        let participant = take(&mut values).into_address().map_err(bad_args)?;

        let mut state = self.state.lock().unwrap();
        let record = state
            .challenges
            .get_mut(&id)
            .ok_or_else(|| revert("unknown challenge"))?;

        if record.challenge.creator != self.sender {
            return Err(revert("not the creator"));
        }
        if record.challenge.is_settled {
            return Err(revert("challenge settled"));
        }
        let flags = record
            .flags
            .get_mut(&participant)
            .filter(|f| f.has_joined)
            .ok_or_else(|| revert("not a participant"))?;
        if flags.has_passed {
            return Err(revert("already passed"));
        }
        flags.has_passed = true;

        Ok(vec![self.log(
            vec![
                event_topic(SIG_CHALLENGE_PASSED),
                uint_topic(id),
                address_topic(participant),
            ],
            Vec::new(),
        )])
    }

    fn settle(&self, args: &[u8]) -> Result<Vec<Log>, ChainError> {
        let id = decode_id(args)?;
        let mut state = self.state.lock().unwrap();
        let record = state
            .challenges
            .get_mut(&id.raw())
            .ok_or_else(|| revert("unknown challenge"))?;

        if record.challenge.creator != self.sender {
            return Err(revert("not the creator"));
        }
        if record.challenge.is_settled {
            return Err(revert("already settled"));
        }

        let winners: Vec<Address> = record
            .flags
            .iter()
            .filter(|(_, f)| f.has_passed)
            .map(|(a, _)| *a)
            .collect();

        // Equal split among passed participants. Integer division; the dust
        // remainder stays in the pool.
        let prize = if winners.is_empty() {
            StakeAmount::ZERO
        } else {
            let (each, _) = record.challenge.pool.raw().div_rem_u64(winners.len() as u64);
            StakeAmount::new(each)
        };
        let mut distributed = StakeAmount::ZERO;
        for winner in &winners {
            record.payouts.insert(*winner, prize);
            distributed = distributed
                .checked_add(prize)
                .ok_or_else(|| revert("pool overflow"))?;
        }
        record.challenge.pool = record.challenge.pool.saturating_sub(distributed);
        record.challenge.is_settled = true;

        Ok(vec![self.log(
            vec![event_topic(SIG_CHALLENGE_SETTLED), uint_topic(id.raw())],
            encode(&[Token::Uint(prize.raw())]),
        )])
    }

    fn claim(&self, args: &[u8]) -> Result<Vec<Log>, ChainError> {
        let id = decode_id(args)?;
        let mut state = self.state.lock().unwrap();
        let record = state
            .challenges
            .get_mut(&id.raw())
            .ok_or_else(|| revert("unknown challenge"))?;

        if !record.challenge.is_settled {
            return Err(revert("not settled"));
        }
        let flags = record
            .flags
            .get_mut(&self.sender)
            .filter(|f| f.has_passed)
            .ok_or_else(|| revert("nothing to claim"))?;
        if flags.has_claimed {
            return Err(revert("already claimed"));
        }
        flags.has_claimed = true;
        let amount = record
            .payouts
            .get(&self.sender)
            .copied()
            .unwrap_or(StakeAmount::ZERO);

        Ok(vec![self.log(
            vec![
                event_topic(SIG_REWARD_CLAIMED),
                uint_topic(id.raw()),
                address_topic(self.sender),
            ],
            encode(&[Token::Uint(amount.raw())]),
        )])
    }

    // ── View dispatch ───────────────────────────────────────────────────

    fn view(&self, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let (sel, args) = split_calldata(data)?;
        let now = self.now();
        let state = self.state.lock().unwrap();

        if sel == selector(SIG_GET_ALL_CHALLENGES) {
            let tokens: Vec<Token> = state
                .challenges
                .values()
                .map(|r| challenge_to_token(&r.challenge))
                .collect();
            return Ok(encode(&[Token::Array(tokens)]));
        }
        if sel == selector(SIG_GET_CHALLENGE_BY_ID) {
            let id = decode_id(args)?;
            let record = state
                .challenges
                .get(&id.raw())
                .ok_or_else(|| revert("unknown challenge"))?;
            return Ok(encode(&[challenge_to_token(&record.challenge)]));
        }
        if sel == selector(SIG_GET_CHALLENGE_STATE) {
            let id = decode_id(args)?;
            let record = state
                .challenges
                .get(&id.raw())
                .ok_or_else(|| revert("unknown challenge"))?;
            let phase = record.challenge.phase(now);
            return Ok(encode(&[Token::Uint(U256::from_u64(phase.as_u8() as u64))]));
        }
        if sel == selector(SIG_STAKE_AMOUNT) {
            return Ok(encode(&[Token::Uint(state.stake.raw())]));
        }
        if sel == selector(SIG_CLAIMABLE_REWARD) {
            let (id, who) = decode_id_address(args)?;
            let amount = state
                .challenges
                .get(&id.raw())
                .filter(|r| r.challenge.is_settled)
                .and_then(|r| {
                    let flags = r.flags.get(&who)?;
                    (flags.has_passed && !flags.has_claimed).then(|| r.payouts.get(&who).copied())?
                })
                .unwrap_or(StakeAmount::ZERO);
            return Ok(encode(&[Token::Uint(amount.raw())]));
        }
        for (signature, pick) in [
            (SIG_HAS_JOINED, (|f: Participation| f.has_joined) as fn(Participation) -> bool),
            (SIG_HAS_PASSED, |f| f.has_passed),
            (SIG_HAS_CLAIMED, |f| f.has_claimed),
        ] {
            if sel == selector(signature) {
                let (id, who) = decode_id_address(args)?;
                let flags = state
                    .challenges
                    .get(&id.raw())
                    .and_then(|r| r.flags.get(&who).copied())
                    .unwrap_or(Participation::NONE);
                return Ok(encode(&[Token::Bool(pick(flags))]));
            }
        }
        Err(revert("unknown function"))
    }

    fn log(&self, topics: Vec<[u8; 32]>, data: Vec<u8>) -> Log {
        Log {
            address: self.platform,
            topics,
            data,
        }
    }
}

#[async_trait]
impl ChainClient for NullChain {
    fn sender(&self) -> Address {
        self.sender
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        self.check_network()?;
        if to != self.platform {
            return Err(revert("unknown contract"));
        }
        self.view(&data)
    }

    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        self.check_network()?;
        {
            let mut switches = self.switches.lock().unwrap();
            if switches.reject_next {
                switches.reject_next = false;
                return Err(ChainError::UserRejected);
            }
        }

        // Deployments just mint an address; the platform is always resident.
        if tx.to.is_none() {
            let mut state = self.state.lock().unwrap();
            let tx_hash = Self::next_tx_hash(&mut state);
            return Ok(TxReceipt {
                tx_hash,
                contract_address: Some(self.platform),
                logs: Vec::new(),
            });
        }

        if tx.to != Some(self.platform) {
            return Err(revert("unknown contract"));
        }
        let logs = self.execute(&tx)?;
        let mut state = self.state.lock().unwrap();
        let tx_hash = Self::next_tx_hash(&mut state);
        Ok(TxReceipt {
            tx_hash,
            contract_address: None,
            logs,
        })
    }
}

fn revert(reason: &str) -> ChainError {
    ChainError::Revert(format!("execution reverted: {reason}"))
}

fn bad_args(e: strive_abi::AbiError) -> ChainError {
    ChainError::Revert(format!("execution reverted: bad calldata: {e}"))
}

fn split_calldata(data: &[u8]) -> Result<([u8; 4], &[u8]), ChainError> {
    if data.len() < 4 {
        return Err(revert("missing selector"));
    }
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&data[..4]);
    Ok((sel, &data[4..]))
}

fn decode_args(types: &[ParamType], args: &[u8]) -> Result<Vec<Token>, ChainError> {
    decode(types, args).map_err(bad_args)
}

fn take(values: &mut Vec<Token>) -> Token {
    values.remove(0)
}

fn decode_id(args: &[u8]) -> Result<ChallengeId, ChainError> {
    let mut values = decode_args(&[ParamType::Uint], args)?;
    Ok(ChallengeId::new(take(&mut values).into_u64().map_err(bad_args)?))
}

fn decode_id_address(args: &[u8]) -> Result<(ChallengeId, Address), ChainError> {
    let mut values = decode_args(&[ParamType::Uint, ParamType::Address], args)?;
    let id = ChallengeId::new(take(&mut values).into_u64().map_err(bad_args)?);
    let who = take(&mut values).into_address().map_err(bad_args)?;
    Ok((id, who))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strive_abi::ChallengePlatform;

    fn platform() -> ChallengePlatform {
        ChallengePlatform::new(NullChain::PLATFORM)
    }

    fn stake() -> StakeAmount {
        StakeAmount::from_tokens(10)
    }

    async fn create(chain: &NullChain, name: &str) -> ChallengeId {
        let receipt = chain
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().create_challenge(name, None),
            ))
            .await
            .unwrap();
        match strive_abi::event::decode_event(&receipt.logs[0].topics, &receipt.logs[0].data)
            .unwrap()
            .unwrap()
        {
            strive_abi::PlatformEvent::Created { id, .. } => id,
            other => panic!("unexpected event {other:?}"),
        }
    }

    async fn join(chain: &NullChain, id: ChallengeId) {
        chain
            .submit(
                TxRequest::call(NullChain::PLATFORM, platform().join_challenge(id))
                    .with_value(stake().raw()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_join_settle_claim_flow() {
        let creator = NullChain::new(stake());
        let alice = creator.for_sender(account(0x0a));
        let bob = creator.for_sender(account(0x0b));

        let id = create(&creator, "Daily Coding").await;
        join(&alice, id).await;
        join(&bob, id).await;

        let challenge = creator.challenge(id).unwrap();
        assert_eq!(challenge.player_count, 2);
        assert_eq!(challenge.pool, StakeAmount::from_tokens(20));

        creator
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().mark_challenge_passed(id, alice.sender()),
            ))
            .await
            .unwrap();
        creator
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().settle_challenge(id),
            ))
            .await
            .unwrap();

        // Only alice passed; she gets the whole pool.
        let claimable = alice
            .call(
                NullChain::PLATFORM,
                platform().claimable_reward(id, alice.sender()),
            )
            .await
            .unwrap();
        assert_eq!(
            ChallengePlatform::decode_stake(&claimable).unwrap(),
            StakeAmount::from_tokens(20)
        );

        alice
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().claim_rewards(id),
            ))
            .await
            .unwrap();
        assert!(alice.participation(id, alice.sender()).has_claimed);

        // Claimed rewards cannot be claimed twice.
        let err = alice
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().claim_rewards(id),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Revert(_)));
    }

    #[tokio::test]
    async fn double_join_reverts() {
        let chain = NullChain::new(stake());
        let id = create(&chain, "once").await;
        join(&chain, id).await;
        let err = chain
            .submit(
                TxRequest::call(NullChain::PLATFORM, platform().join_challenge(id))
                    .with_value(stake().raw()),
            )
            .await
            .unwrap_err();
        assert_eq!(err, revert("already joined"));
    }

    #[tokio::test]
    async fn join_requires_exact_stake() {
        let chain = NullChain::new(stake());
        let id = create(&chain, "exact").await;
        let err = chain
            .submit(
                TxRequest::call(NullChain::PLATFORM, platform().join_challenge(id))
                    .with_value(StakeAmount::from_tokens(1).raw()),
            )
            .await
            .unwrap_err();
        assert_eq!(err, revert("stake mismatch"));
    }

    #[tokio::test]
    async fn window_gates_joins() {
        let chain = NullChain::new(stake());
        let now = chain.clock().now().as_secs();
        let receipt = chain
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().create_challenge(
                    "windowed",
                    Some((Timestamp::new(now + 100), Timestamp::new(now + 200))),
                ),
            ))
            .await
            .unwrap();
        let id = match strive_abi::event::decode_event(
            &receipt.logs[0].topics,
            &receipt.logs[0].data,
        )
        .unwrap()
        .unwrap()
        {
            strive_abi::PlatformEvent::Created { id, .. } => id,
            other => panic!("unexpected event {other:?}"),
        };

        let join_tx = || {
            TxRequest::call(NullChain::PLATFORM, platform().join_challenge(id))
                .with_value(stake().raw())
        };
        assert_eq!(
            chain.submit(join_tx()).await.unwrap_err(),
            revert("challenge not started")
        );
        chain.clock().advance(150);
        chain.submit(join_tx()).await.unwrap();
        chain.clock().advance(100);
        let late = chain.for_sender(account(0x0f));
        assert_eq!(
            late.submit(join_tx()).await.unwrap_err(),
            revert("challenge ended")
        );
    }

    #[tokio::test]
    async fn only_creator_marks_and_settles() {
        let creator = NullChain::new(stake());
        let stranger = creator.for_sender(account(0x0a));
        let id = create(&creator, "gated").await;
        join(&stranger, id).await;

        let err = stranger
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().mark_challenge_passed(id, stranger.sender()),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, revert("not the creator"));

        let err = stranger
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().settle_challenge(id),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, revert("not the creator"));
    }

    #[tokio::test]
    async fn settle_splits_pool_equally_with_dust() {
        let creator = NullChain::new(StakeAmount::from_base_units(10));
        let id = create(&creator, "split").await;
        let players = [account(0x0a), account(0x0b), account(0x0c)];
        for player in players {
            creator
                .for_sender(player)
                .submit(
                    TxRequest::call(NullChain::PLATFORM, platform().join_challenge(id))
                        .with_value(U256::from_u64(10)),
                )
                .await
                .unwrap();
            creator
                .submit(TxRequest::call(
                    NullChain::PLATFORM,
                    platform().mark_challenge_passed(id, player),
                ))
                .await
                .unwrap();
        }
        creator
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().settle_challenge(id),
            ))
            .await
            .unwrap();

        // 30 units over 3 winners: 10 each, no dust.
        for player in players {
            let data = creator
                .call(NullChain::PLATFORM, platform().claimable_reward(id, player))
                .await
                .unwrap();
            assert_eq!(
                ChallengePlatform::decode_stake(&data).unwrap(),
                StakeAmount::from_base_units(10)
            );
        }
        assert!(creator.challenge(id).unwrap().pool.is_zero());
    }

    #[tokio::test]
    async fn reject_and_network_switches() {
        let chain = NullChain::new(stake());
        chain.reject_next();
        let err = chain
            .submit(TxRequest::call(
                NullChain::PLATFORM,
                platform().create_challenge("x", None),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, ChainError::UserRejected);

        // The switch is one-shot.
        create(&chain, "x").await;

        chain.fail_network(true);
        let err = chain
            .call(NullChain::PLATFORM, platform().get_all_challenges())
            .await
            .unwrap_err();
        assert!(err.is_transient());
        chain.fail_network(false);
        chain
            .call(NullChain::PLATFORM, platform().get_all_challenges())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn views_reflect_state() {
        let chain = NullChain::new(stake());
        let id = create(&chain, "views").await;
        join(&chain, id).await;

        let data = chain
            .call(NullChain::PLATFORM, platform().stake_amount())
            .await
            .unwrap();
        assert_eq!(ChallengePlatform::decode_stake(&data).unwrap(), stake());

        let data = chain
            .call(NullChain::PLATFORM, platform().has_joined(id, chain.sender()))
            .await
            .unwrap();
        assert!(ChallengePlatform::decode_bool(&data).unwrap());

        let data = chain
            .call(NullChain::PLATFORM, platform().get_challenge_state(id))
            .await
            .unwrap();
        assert_eq!(
            ChallengePlatform::decode_phase(&data).unwrap(),
            ChallengePhase::Active
        );

        let data = chain
            .call(NullChain::PLATFORM, platform().get_all_challenges())
            .await
            .unwrap();
        let all = ChallengePlatform::decode_challenges(&data).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
    }
}

//! Typed binding for the deployed ChallengePlatform contract.
//!
//! The binding pairs canonical function signatures with the deployed address
//! for the active network. It is immutable configuration: callers pin one
//! binding+address pair per network and never mutate it at runtime.

use crate::decode::decode_single;
use crate::encode::encode_call;
use crate::error::AbiError;
use crate::token::{ParamType, Token};
use strive_types::{
    Address, Challenge, ChallengeId, ChallengePhase, NetworkId, StakeAmount, Timestamp, U256,
};

// Canonical function signatures. The selector of each is the first four
// bytes of its Keccak-256 hash.
pub const SIG_CREATE_CHALLENGE: &str = "createChallenge(string,uint256,uint256)";
pub const SIG_JOIN_CHALLENGE: &str = "joinChallenge(uint256)";
pub const SIG_MARK_PASSED: &str = "markChallengePassed(uint256,address)";
pub const SIG_SETTLE_CHALLENGE: &str = "settleChallenge(uint256)";
pub const SIG_CLAIM_REWARDS: &str = "claimRewards(uint256)";
pub const SIG_GET_ALL_CHALLENGES: &str = "getAllChallenges()";
pub const SIG_GET_CHALLENGE_BY_ID: &str = "getChallengeById(uint256)";
pub const SIG_GET_CHALLENGE_STATE: &str = "getChallengeState(uint256)";
pub const SIG_STAKE_AMOUNT: &str = "stakeAmount()";
pub const SIG_CLAIMABLE_REWARD: &str = "claimableReward(uint256,address)";
pub const SIG_HAS_JOINED: &str = "hasJoined(uint256,address)";
pub const SIG_HAS_PASSED: &str = "hasPassed(uint256,address)";
pub const SIG_HAS_CLAIMED: &str = "hasClaimed(uint256,address)";

/// The on-chain Challenge struct layout:
/// `(id, name, creator, startDate, endDate, pool, playerCount, isSettled)`.
pub fn challenge_param_type() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint,
        ParamType::String,
        ParamType::Address,
        ParamType::Uint,
        ParamType::Uint,
        ParamType::Uint,
        ParamType::Uint,
        ParamType::Bool,
    ])
}

/// A handle on the ChallengePlatform contract at a fixed address.
#[derive(Clone, Debug)]
pub struct ChallengePlatform {
    address: Address,
}

impl ChallengePlatform {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// The pinned deployment for a network, if one exists.
    pub fn deployed(network: NetworkId) -> Option<Self> {
        let address = match network {
            NetworkId::Test => "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2",
            NetworkId::Live | NetworkId::Dev => return None,
        };
        let address = Address::from_hex(address).expect("pinned contract address is valid hex");
        Some(Self::new(address))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    // ── Calldata builders ───────────────────────────────────────────────

    /// `createChallenge(name, startDate, endDate)`. A missing window is
    /// encoded as `(0, 0)`, which the contract treats as "no window".
    pub fn create_challenge(&self, name: &str, window: Option<(Timestamp, Timestamp)>) -> Vec<u8> {
        let (start, end) = window
            .map(|(s, e)| (s.as_secs(), e.as_secs()))
            .unwrap_or((0, 0));
        encode_call(
            SIG_CREATE_CHALLENGE,
            &[
                Token::String(name.to_string()),
                Token::Uint(U256::from_u64(start)),
                Token::Uint(U256::from_u64(end)),
            ],
        )
    }

    /// `joinChallenge(id)` — payable; the fixed stake rides on the
    /// transaction's value field.
    pub fn join_challenge(&self, id: ChallengeId) -> Vec<u8> {
        encode_call(SIG_JOIN_CHALLENGE, &[id_token(id)])
    }

    pub fn mark_challenge_passed(&self, id: ChallengeId, participant: Address) -> Vec<u8> {
        encode_call(SIG_MARK_PASSED, &[id_token(id), Token::Address(participant)])
    }

    pub fn settle_challenge(&self, id: ChallengeId) -> Vec<u8> {
        encode_call(SIG_SETTLE_CHALLENGE, &[id_token(id)])
    }

    pub fn claim_rewards(&self, id: ChallengeId) -> Vec<u8> {
        encode_call(SIG_CLAIM_REWARDS, &[id_token(id)])
    }

    pub fn get_all_challenges(&self) -> Vec<u8> {
        encode_call(SIG_GET_ALL_CHALLENGES, &[])
    }

    pub fn get_challenge_by_id(&self, id: ChallengeId) -> Vec<u8> {
        encode_call(SIG_GET_CHALLENGE_BY_ID, &[id_token(id)])
    }

    pub fn get_challenge_state(&self, id: ChallengeId) -> Vec<u8> {
        encode_call(SIG_GET_CHALLENGE_STATE, &[id_token(id)])
    }

    pub fn stake_amount(&self) -> Vec<u8> {
        encode_call(SIG_STAKE_AMOUNT, &[])
    }

    pub fn claimable_reward(&self, id: ChallengeId, participant: Address) -> Vec<u8> {
        encode_call(
            SIG_CLAIMABLE_REWARD,
            &[id_token(id), Token::Address(participant)],
        )
    }

    pub fn has_joined(&self, id: ChallengeId, participant: Address) -> Vec<u8> {
        encode_call(SIG_HAS_JOINED, &[id_token(id), Token::Address(participant)])
    }

    pub fn has_passed(&self, id: ChallengeId, participant: Address) -> Vec<u8> {
        encode_call(SIG_HAS_PASSED, &[id_token(id), Token::Address(participant)])
    }

    pub fn has_claimed(&self, id: ChallengeId, participant: Address) -> Vec<u8> {
        encode_call(SIG_HAS_CLAIMED, &[id_token(id), Token::Address(participant)])
    }

    // ── Response decoders ───────────────────────────────────────────────

    pub fn decode_challenges(data: &[u8]) -> Result<Vec<Challenge>, AbiError> {
        let array = decode_single(&ParamType::Array(Box::new(challenge_param_type())), data)?
            .into_array()?;
        array.into_iter().map(challenge_from_token).collect()
    }

    pub fn decode_challenge(data: &[u8]) -> Result<Challenge, AbiError> {
        // A single returned struct is wrapped like a one-element frame.
        challenge_from_token(decode_single(&challenge_param_type(), data)?)
    }

    pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
        decode_single(&ParamType::Bool, data)?.into_bool()
    }

    pub fn decode_stake(data: &[u8]) -> Result<StakeAmount, AbiError> {
        Ok(StakeAmount::new(
            decode_single(&ParamType::Uint, data)?.into_uint()?,
        ))
    }

    pub fn decode_phase(data: &[u8]) -> Result<ChallengePhase, AbiError> {
        let raw = decode_single(&ParamType::Uint, data)?.into_u64()?;
        let byte = u8::try_from(raw).ok().and_then(ChallengePhase::from_u8);
        byte.ok_or(AbiError::Malformed {
            context: "challenge state",
            detail: format!("unknown phase value {raw}"),
        })
    }
}

fn id_token(id: ChallengeId) -> Token {
    Token::Uint(U256::from_u64(id.raw()))
}

/// Convert a raw ABI-decoded tuple into the strongly-typed challenge record,
/// rejecting malformed responses instead of propagating untyped data.
pub fn challenge_from_token(token: Token) -> Result<Challenge, AbiError> {
    let fields = token.into_tuple()?;
    if fields.len() != 8 {
        return Err(AbiError::Malformed {
            context: "challenge tuple",
            detail: format!("expected 8 fields, got {}", fields.len()),
        });
    }
    let mut fields = fields.into_iter();
    // Field order matches `challenge_param_type`.
    let id = ChallengeId::new(fields.next().expect("len checked").into_u64()?);
    let name = fields.next().expect("len checked").into_string()?;
    let creator = fields.next().expect("len checked").into_address()?;
    let start = fields.next().expect("len checked").into_u64()?;
    let end = fields.next().expect("len checked").into_u64()?;
    let pool = StakeAmount::new(fields.next().expect("len checked").into_uint()?);
    let player_count = fields.next().expect("len checked").into_u64()?;
    let is_settled = fields.next().expect("len checked").into_bool()?;

    let window = if start == 0 && end == 0 {
        None
    } else {
        Some((Timestamp::new(start), Timestamp::new(end)))
    };

    Ok(Challenge {
        id,
        name,
        creator,
        window,
        pool,
        player_count,
        is_settled,
    })
}

/// Encode a challenge record back into its ABI tuple (the inverse of
/// [`challenge_from_token`]).
pub fn challenge_to_token(challenge: &Challenge) -> Token {
    let (start, end) = challenge
        .window
        .map(|(s, e)| (s.as_secs(), e.as_secs()))
        .unwrap_or((0, 0));
    Token::Tuple(vec![
        Token::Uint(U256::from_u64(challenge.id.raw())),
        Token::String(challenge.name.clone()),
        Token::Address(challenge.creator),
        Token::Uint(U256::from_u64(start)),
        Token::Uint(U256::from_u64(end)),
        Token::Uint(challenge.pool.raw()),
        Token::Uint(U256::from_u64(challenge.player_count)),
        Token::Bool(challenge.is_settled),
    ])
}

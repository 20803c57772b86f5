//! ChallengePlatform event log decoding.
//!
//! Indexed parameters arrive as topics (one 32-byte word each, after topic0),
//! non-indexed parameters as an ABI frame in the log data. Logs whose topic0
//! matches none of the platform's events decode to `None` so callers can skip
//! foreign logs without treating them as errors.

use crate::decode::decode;
use crate::encode::event_topic;
use crate::error::AbiError;
use crate::token::ParamType;
use strive_types::{Address, ChallengeId, StakeAmount, U256};

pub const SIG_CHALLENGE_CREATED: &str = "ChallengeCreated(uint256,string,address)";
pub const SIG_CHALLENGE_JOINED: &str = "ChallengeJoined(uint256,address,uint256)";
pub const SIG_CHALLENGE_PASSED: &str = "ChallengePassed(uint256,address)";
pub const SIG_CHALLENGE_SETTLED: &str = "ChallengeSettled(uint256,uint256)";
pub const SIG_REWARD_CLAIMED: &str = "RewardClaimed(uint256,address,uint256)";

/// A decoded platform event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    Created {
        id: ChallengeId,
        name: String,
        creator: Address,
    },
    Joined {
        id: ChallengeId,
        participant: Address,
        stake: StakeAmount,
    },
    Passed {
        id: ChallengeId,
        participant: Address,
    },
    Settled {
        id: ChallengeId,
        prize_per_winner: StakeAmount,
    },
    Claimed {
        id: ChallengeId,
        participant: Address,
        amount: StakeAmount,
    },
}

impl PlatformEvent {
    pub fn challenge_id(&self) -> ChallengeId {
        match self {
            Self::Created { id, .. }
            | Self::Joined { id, .. }
            | Self::Passed { id, .. }
            | Self::Settled { id, .. }
            | Self::Claimed { id, .. } => *id,
        }
    }
}

/// Decode one log entry. `Ok(None)` means the log belongs to some other
/// contract or event and is not an error.
pub fn decode_event(topics: &[[u8; 32]], data: &[u8]) -> Result<Option<PlatformEvent>, AbiError> {
    let Some(topic0) = topics.first() else {
        return Ok(None);
    };

    if *topic0 == event_topic(SIG_CHALLENGE_CREATED) {
        let id = topic_id(topics, 1)?;
        let creator = topic_address(topics, 2)?;
        let mut values = decode(&[ParamType::String], data)?;
        let name = values.remove(0).into_string()?;
        return Ok(Some(PlatformEvent::Created { id, name, creator }));
    }
    if *topic0 == event_topic(SIG_CHALLENGE_JOINED) {
        let id = topic_id(topics, 1)?;
        let participant = topic_address(topics, 2)?;
        let mut values = decode(&[ParamType::Uint], data)?;
        let stake = StakeAmount::new(values.remove(0).into_uint()?);
        return Ok(Some(PlatformEvent::Joined {
            id,
            participant,
            stake,
        }));
    }
    if *topic0 == event_topic(SIG_CHALLENGE_PASSED) {
        let id = topic_id(topics, 1)?;
        let participant = topic_address(topics, 2)?;
        return Ok(Some(PlatformEvent::Passed { id, participant }));
    }
    if *topic0 == event_topic(SIG_CHALLENGE_SETTLED) {
        let id = topic_id(topics, 1)?;
        let mut values = decode(&[ParamType::Uint], data)?;
        let prize = StakeAmount::new(values.remove(0).into_uint()?);
        return Ok(Some(PlatformEvent::Settled {
            id,
            prize_per_winner: prize,
        }));
    }
    if *topic0 == event_topic(SIG_REWARD_CLAIMED) {
        let id = topic_id(topics, 1)?;
        let participant = topic_address(topics, 2)?;
        let mut values = decode(&[ParamType::Uint], data)?;
        let amount = StakeAmount::new(values.remove(0).into_uint()?);
        return Ok(Some(PlatformEvent::Claimed {
            id,
            participant,
            amount,
        }));
    }

    Ok(None)
}

fn topic_word(topics: &[[u8; 32]], index: usize) -> Result<[u8; 32], AbiError> {
    topics.get(index).copied().ok_or(AbiError::Malformed {
        context: "event topics",
        detail: format!("missing indexed topic {index}"),
    })
}

fn topic_id(topics: &[[u8; 32]], index: usize) -> Result<ChallengeId, AbiError> {
    let word = topic_word(topics, index)?;
    let raw = U256::from_be_bytes(word).to_u64().ok_or(AbiError::Malformed {
        context: "event topics",
        detail: "challenge id does not fit in u64".into(),
    })?;
    Ok(ChallengeId::new(raw))
}

fn topic_address(topics: &[[u8; 32]], index: usize) -> Result<Address, AbiError> {
    let word = topic_word(topics, index)?;
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..32]);
    Ok(Address::new(bytes))
}

/// Build the topic word for an indexed uint (used by test doubles when
/// emitting logs).
pub fn uint_topic(value: u64) -> [u8; 32] {
    U256::from_u64(value).to_be_bytes()
}

/// Build the topic word for an indexed address.
pub fn address_topic(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

//! Cached lifecycle state: per-challenge views and published snapshots.

use std::fmt;

use strive_types::{Address, Challenge, ChallengeId, Participation, StakeAmount, Standing};

use crate::error::LifecycleError;

/// Kind of mutating operation, for in-flight bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpKind {
    Create,
    Join,
    MarkPassed,
    Settle,
    Claim,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Join => "join",
            Self::MarkPassed => "mark-passed",
            Self::Settle => "settle",
            Self::Claim => "claim",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory lock key: at most one pending transaction per key.
///
/// `Create` is keyed globally because the challenge id does not exist until
/// the transaction mines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InFlightKey {
    Create,
    Op(ChallengeId, OpKind),
}

impl InFlightKey {
    pub fn kind(&self) -> OpKind {
        match self {
            Self::Create => OpKind::Create,
            Self::Op(_, kind) => *kind,
        }
    }
}

/// One challenge as seen by the connected account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeView {
    pub challenge: Challenge,
    pub participation: Participation,
    pub standing: Standing,
    /// Unclaimed reward, nonzero only after settlement for passed
    /// participants.
    pub claimable: StakeAmount,
}

/// A point-in-time copy of the whole cached state, published over a
/// `tokio::sync::watch` channel after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub account: Address,
    /// Fixed per-contract join stake.
    pub stake: StakeAmount,
    pub challenges: Vec<ChallengeView>,
    pub in_flight: Vec<InFlightKey>,
    pub last_error: Option<LifecycleError>,
}

impl Snapshot {
    pub fn challenge(&self, id: ChallengeId) -> Option<&ChallengeView> {
        self.challenges.iter().find(|v| v.challenge.id == id)
    }

    pub fn is_in_flight(&self, key: InFlightKey) -> bool {
        self.in_flight.contains(&key)
    }
}

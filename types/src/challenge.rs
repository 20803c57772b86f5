//! Challenge records and participation state.
//!
//! The authoritative copy of every field lives in the on-chain contract; the
//! client only mirrors it. All transitions are monotonic: `pool` and
//! `player_count` never decrease before settlement, the participation flags
//! are set exactly once and never cleared, and `is_settled` never reverts.

use crate::address::Address;
use crate::amount::StakeAmount;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract-assigned challenge identifier, globally unique and immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChallengeId(u64);

impl ChallengeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A challenge record, mirroring the on-chain struct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    /// Free-text name, set at creation, immutable thereafter.
    pub name: String,
    /// Only this address may mark participants passed or settle.
    pub creator: Address,
    /// Optional validity window (absent on challenges created before the
    /// contract revision that introduced dates).
    pub window: Option<(Timestamp, Timestamp)>,
    /// Cumulative stake from all joiners, drained at settlement.
    pub pool: StakeAmount,
    /// Number of distinct addresses that joined.
    pub player_count: u64,
    pub is_settled: bool,
}

impl Challenge {
    /// Coarse contract-side phase as of `now`.
    pub fn phase(&self, now: Timestamp) -> ChallengePhase {
        if self.is_settled {
            return ChallengePhase::Settled;
        }
        match self.window {
            Some((start, _)) if now < start => ChallengePhase::Pending,
            Some((_, end)) if now >= end => ChallengePhase::Ended,
            _ => ChallengePhase::Active,
        }
    }
}

/// Contract-side challenge phase, as returned by `getChallengeState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengePhase {
    /// Validity window has not opened yet.
    Pending,
    /// Open for joins.
    Active,
    /// Window closed, awaiting settlement.
    Ended,
    /// Settled; pool distributed.
    Settled,
}

impl ChallengePhase {
    /// Decode the contract's uint8 representation.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Ended),
            3 => Some(Self::Settled),
            _ => None,
        }
    }

    /// The contract's uint8 representation.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Ended => 2,
            Self::Settled => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

/// Per (challenge, address) participation flags.
///
/// Each flag is set at most once by its corresponding transaction and never
/// cleared; the contract maintains `has_claimed ⇒ has_passed ⇒ has_joined`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub has_joined: bool,
    pub has_passed: bool,
    pub has_claimed: bool,
}

impl Participation {
    pub const NONE: Self = Self {
        has_joined: false,
        has_passed: false,
        has_claimed: false,
    };

    /// Whether the implication chain `claimed ⇒ passed ⇒ joined` holds.
    pub fn is_consistent(&self) -> bool {
        (!self.has_claimed || self.has_passed) && (!self.has_passed || self.has_joined)
    }
}

/// A challenge's lifecycle state from one observing address's point of view.
///
/// Transitions only move forward, matching the contract's irreversibility
/// invariants: `Unjoined → Joined → Passed → Settled → Claimed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Standing {
    Unjoined,
    Joined,
    Passed,
    /// Settled with a pending claim for this address.
    Settled,
    Claimed,
}

impl Standing {
    /// Derive the observer's standing from their flags and the challenge's
    /// settlement status.
    pub fn derive(participation: Participation, is_settled: bool) -> Self {
        if participation.has_claimed {
            Self::Claimed
        } else if is_settled && participation.has_passed {
            Self::Settled
        } else if participation.has_passed {
            Self::Passed
        } else if participation.has_joined {
            Self::Joined
        } else {
            Self::Unjoined
        }
    }

    pub fn can_join(&self) -> bool {
        matches!(self, Self::Unjoined)
    }

    pub fn can_claim(&self) -> bool {
        matches!(self, Self::Settled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unjoined => "unjoined",
            Self::Joined => "joined",
            Self::Passed => "passed",
            Self::Settled => "settled",
            Self::Claimed => "claimed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge_with_window(start: u64, end: u64, settled: bool) -> Challenge {
        Challenge {
            id: ChallengeId::new(1),
            name: "Daily Coding".into(),
            creator: Address::ZERO,
            window: Some((Timestamp::new(start), Timestamp::new(end))),
            pool: StakeAmount::ZERO,
            player_count: 0,
            is_settled: settled,
        }
    }

    #[test]
    fn phase_follows_window() {
        let c = challenge_with_window(100, 200, false);
        assert_eq!(c.phase(Timestamp::new(50)), ChallengePhase::Pending);
        assert_eq!(c.phase(Timestamp::new(150)), ChallengePhase::Active);
        assert_eq!(c.phase(Timestamp::new(200)), ChallengePhase::Ended);
    }

    #[test]
    fn settled_phase_wins_over_window() {
        let c = challenge_with_window(100, 200, true);
        assert_eq!(c.phase(Timestamp::new(150)), ChallengePhase::Settled);
    }

    #[test]
    fn windowless_challenge_is_always_active_until_settled() {
        let mut c = challenge_with_window(0, 0, false);
        c.window = None;
        assert_eq!(c.phase(Timestamp::new(0)), ChallengePhase::Active);
        c.is_settled = true;
        assert_eq!(c.phase(Timestamp::new(0)), ChallengePhase::Settled);
    }

    #[test]
    fn participation_consistency() {
        assert!(Participation::NONE.is_consistent());
        assert!(Participation { has_joined: true, has_passed: true, has_claimed: true }
            .is_consistent());
        assert!(!Participation { has_joined: false, has_passed: true, has_claimed: false }
            .is_consistent());
        assert!(!Participation { has_joined: true, has_passed: false, has_claimed: true }
            .is_consistent());
    }

    #[test]
    fn standing_derivation_is_monotonic() {
        let joined = Participation { has_joined: true, ..Participation::NONE };
        let passed = Participation { has_joined: true, has_passed: true, has_claimed: false };
        let claimed = Participation { has_joined: true, has_passed: true, has_claimed: true };

        assert_eq!(Standing::derive(Participation::NONE, false), Standing::Unjoined);
        assert_eq!(Standing::derive(joined, false), Standing::Joined);
        assert_eq!(Standing::derive(passed, false), Standing::Passed);
        assert_eq!(Standing::derive(passed, true), Standing::Settled);
        assert_eq!(Standing::derive(claimed, true), Standing::Claimed);
        assert!(Standing::Unjoined < Standing::Joined);
        assert!(Standing::Settled < Standing::Claimed);
    }

    #[test]
    fn joined_but_unpassed_stays_joined_after_settlement() {
        let joined = Participation { has_joined: true, ..Participation::NONE };
        // A joiner the creator never marked passed has nothing to claim.
        assert_eq!(Standing::derive(joined, true), Standing::Joined);
    }
}

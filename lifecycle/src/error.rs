//! Lifecycle operation errors.

use strive_abi::AbiError;
use strive_chain::ChainError;
use strive_types::ChallengeId;
use thiserror::Error;

use crate::state::OpKind;

/// Client-side precondition failures plus everything the chain layer can
/// report. Precondition variants never cost a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("challenge name must not be empty")]
    EmptyName,

    #[error("challenge window must end after it starts")]
    InvalidWindow,

    #[error("unknown challenge {0}")]
    UnknownChallenge(ChallengeId),

    #[error("already joined challenge {0}")]
    AlreadyJoined(ChallengeId),

    #[error("challenge {0} is already settled")]
    AlreadySettled(ChallengeId),

    #[error("rewards for challenge {0} were already claimed")]
    AlreadyClaimed(ChallengeId),

    #[error("participant already marked passed on challenge {0}")]
    AlreadyPassed(ChallengeId),

    #[error("address has not joined challenge {0}")]
    NotAParticipant(ChallengeId),

    #[error("only the creator of challenge {0} may do this")]
    NotCreator(ChallengeId),

    #[error("nothing to claim on challenge {0}")]
    NotEligible(ChallengeId),

    /// A transaction of the same kind is still pending for this challenge.
    #[error("{0} already in flight")]
    Busy(OpKind),

    /// The transaction mined but its receipt lacks the expected event.
    #[error("receipt is missing the expected event")]
    MissingEvent,

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

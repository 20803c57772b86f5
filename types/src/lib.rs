//! Fundamental types for the strive challenge platform client.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, 256-bit integers, stake amounts, timestamps,
//! challenge records, and participation state.

pub mod address;
pub mod amount;
pub mod challenge;
pub mod error;
pub mod hash;
pub mod network;
pub mod time;
pub mod uint;

pub use address::Address;
pub use amount::StakeAmount;
pub use challenge::{Challenge, ChallengeId, ChallengePhase, Participation, Standing};
pub use error::TypeError;
pub use hash::TxHash;
pub use network::NetworkId;
pub use time::Timestamp;
pub use uint::U256;

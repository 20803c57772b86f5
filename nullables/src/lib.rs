//! Nullable infrastructure for deterministic testing.
//!
//! Real implementations talk to the system clock and a live node; these
//! stand-ins answer from memory, so tests control time and chain state
//! completely.

pub mod chain;
pub mod clock;

pub use chain::{account, NullChain};
pub use clock::NullClock;

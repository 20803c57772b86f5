//! Challenge lifecycle driver.
//!
//! [`LifecycleClient`] owns the cached view of the platform contract for one
//! connected account, guards every mutating operation with client-side
//! preconditions and an in-flight lock, and publishes snapshots over a watch
//! channel. [`Poller`] and [`SharedLifecycleClient`] add cancellable
//! background refresh on top.

pub mod client;
pub mod error;
pub mod poller;
pub mod state;
pub mod view;

pub use client::LifecycleClient;
pub use error::LifecycleError;
pub use poller::{PollOutcome, Poller, SharedLifecycleClient};
pub use state::{ChallengeView, InFlightKey, OpKind, Snapshot};

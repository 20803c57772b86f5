//! Contract binding and minimal ABI codec.
//!
//! This crate supplies the fixed mapping from logical operation names to
//! wire-level function selectors and argument encodings, plus the deployed
//! contract address per network. The codec covers exactly the types the
//! platform and vault contracts use: uint256, address, bool, string, bytes,
//! tuples, and dynamic arrays.

pub mod binding;
pub mod decode;
pub mod encode;
pub mod error;
pub mod event;
pub mod token;

pub use binding::ChallengePlatform;
pub use decode::decode;
pub use encode::{encode, encode_call, event_topic, keccak256, selector};
pub use error::AbiError;
pub use event::PlatformEvent;
pub use token::{ParamType, Token};

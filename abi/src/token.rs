//! ABI value model: typed parameter descriptions and decoded values.

use crate::error::AbiError;
use strive_types::{Address, U256};

/// Wire-level parameter type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// `uint256` (also used for narrower uints, which the ABI pads anyway).
    Uint,
    Address,
    Bool,
    String,
    Bytes,
    Tuple(Vec<ParamType>),
    /// Dynamic array `T[]`.
    Array(Box<ParamType>),
}

impl ParamType {
    /// Whether values of this type live in the tail section.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Uint | Self::Address | Self::Bool => false,
            Self::String | Self::Bytes | Self::Array(_) => true,
            Self::Tuple(items) => items.iter().any(ParamType::is_dynamic),
        }
    }

    /// Number of head bytes a value of this type occupies.
    pub fn head_size(&self) -> usize {
        match self {
            Self::Tuple(items) if !self.is_dynamic() => {
                items.iter().map(ParamType::head_size).sum()
            }
            _ => 32,
        }
    }
}

/// A decoded (or to-be-encoded) ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Token>),
    Array(Vec<Token>),
}

impl Token {
    fn kind(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint256",
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Tuple(_) => "tuple",
            Self::Array(_) => "array",
        }
    }

    pub fn into_uint(self) -> Result<U256, AbiError> {
        match self {
            Self::Uint(v) => Ok(v),
            other => Err(mismatch("uint256", &other)),
        }
    }

    /// Narrow a uint to u64, rejecting out-of-range values.
    pub fn into_u64(self) -> Result<u64, AbiError> {
        let v = self.into_uint()?;
        v.to_u64().ok_or(AbiError::Malformed {
            context: "uint",
            detail: format!("value {v} does not fit in u64"),
        })
    }

    pub fn into_address(self) -> Result<Address, AbiError> {
        match self {
            Self::Address(a) => Ok(a),
            other => Err(mismatch("address", &other)),
        }
    }

    pub fn into_bool(self) -> Result<bool, AbiError> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, AbiError> {
        match self {
            Self::Bytes(b) => Ok(b),
            other => Err(mismatch("bytes", &other)),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Tuple(items) => Ok(items),
            other => Err(mismatch("tuple", &other)),
        }
    }

    pub fn into_array(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(mismatch("array", &other)),
        }
    }
}

fn mismatch(expected: &'static str, got: &Token) -> AbiError {
    AbiError::TypeMismatch {
        expected,
        got: got.kind(),
    }
}

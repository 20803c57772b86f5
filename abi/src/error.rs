//! ABI codec errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("response truncated: need {needed} bytes at offset {offset}, have {have}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        have: usize,
    },

    #[error("offset or length word does not fit in usize")]
    LengthOverflow,

    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,

    #[error("expected {expected}, decoded {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("malformed {context}: {detail}")]
    Malformed {
        context: &'static str,
        detail: String,
    },
}

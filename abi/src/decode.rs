//! ABI decoding: raw response bytes into typed tokens.
//!
//! Every offset and length is bounds-checked before use so malformed
//! responses surface as a typed [`AbiError`] instead of a panic or silently
//! truncated data.

use crate::error::AbiError;
use crate::token::{ParamType, Token};
use strive_types::{Address, U256};

/// Decode one head/tail frame against the expected parameter types.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut head_pos = 0usize;
    for ty in types {
        let (token, consumed) = decode_head(ty, data, head_pos)?;
        tokens.push(token);
        head_pos += consumed;
    }
    Ok(tokens)
}

/// Decode a single return value (the common case for view functions).
pub fn decode_single(ty: &ParamType, data: &[u8]) -> Result<Token, AbiError> {
    let mut tokens = decode(std::slice::from_ref(ty), data)?;
    // decode() produced exactly one token for the single type.
    Ok(tokens.remove(0))
}

fn decode_head(ty: &ParamType, frame: &[u8], head_pos: usize) -> Result<(Token, usize), AbiError> {
    if ty.is_dynamic() {
        let offset = read_usize(frame, head_pos)?;
        let token = decode_tail(ty, frame, offset)?;
        return Ok((token, 32));
    }
    match ty {
        ParamType::Tuple(items) => {
            let mut fields = Vec::with_capacity(items.len());
            let mut pos = head_pos;
            for item in items {
                let (token, consumed) = decode_head(item, frame, pos)?;
                fields.push(token);
                pos += consumed;
            }
            Ok((Token::Tuple(fields), pos - head_pos))
        }
        _ => {
            let word = read_word(frame, head_pos)?;
            Ok((decode_word(ty, word), 32))
        }
    }
}

fn decode_tail(ty: &ParamType, frame: &[u8], pos: usize) -> Result<Token, AbiError> {
    match ty {
        ParamType::String => {
            let bytes = read_length_prefixed(frame, pos)?;
            let s = std::str::from_utf8(bytes).map_err(|_| AbiError::InvalidUtf8)?;
            Ok(Token::String(s.to_string()))
        }
        ParamType::Bytes => {
            let bytes = read_length_prefixed(frame, pos)?;
            Ok(Token::Bytes(bytes.to_vec()))
        }
        ParamType::Array(element) => {
            let len = read_usize(frame, pos)?;
            // Element heads (and their offsets) are relative to the word
            // after the length.
            let start = pos.checked_add(32).ok_or(AbiError::LengthOverflow)?;
            let inner = frame.get(start..).ok_or(AbiError::OutOfBounds {
                offset: start,
                needed: 0,
                have: frame.len(),
            })?;
            // Guard against length words that would allocate absurd vectors.
            if len > inner.len() / 32 {
                return Err(AbiError::Malformed {
                    context: "array",
                    detail: format!("length {len} exceeds remaining data"),
                });
            }
            let mut items = Vec::with_capacity(len);
            let mut head_pos = 0usize;
            for _ in 0..len {
                let (token, consumed) = decode_head(element, inner, head_pos)?;
                items.push(token);
                head_pos += consumed;
            }
            Ok(Token::Array(items))
        }
        ParamType::Tuple(items) => {
            let inner = frame.get(pos..).ok_or(AbiError::OutOfBounds {
                offset: pos,
                needed: 0,
                have: frame.len(),
            })?;
            Ok(Token::Tuple(decode(items, inner)?))
        }
        // Static types never land in the tail.
        ParamType::Uint | ParamType::Address | ParamType::Bool => unreachable!(),
    }
}

fn decode_word(ty: &ParamType, word: [u8; 32]) -> Token {
    match ty {
        ParamType::Uint => Token::Uint(U256::from_be_bytes(word)),
        ParamType::Address => {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..32]);
            Token::Address(Address::new(bytes))
        }
        ParamType::Bool => Token::Bool(word[31] != 0),
        _ => unreachable!(),
    }
}

fn read_word(frame: &[u8], pos: usize) -> Result<[u8; 32], AbiError> {
    let end = pos.checked_add(32).ok_or(AbiError::LengthOverflow)?;
    let slice = frame.get(pos..end).ok_or(AbiError::OutOfBounds {
        offset: pos,
        needed: 32,
        have: frame.len(),
    })?;
    let mut word = [0u8; 32];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_usize(frame: &[u8], pos: usize) -> Result<usize, AbiError> {
    let word = read_word(frame, pos)?;
    U256::from_be_bytes(word)
        .to_u64()
        .map(|v| v as usize)
        .ok_or(AbiError::LengthOverflow)
}

fn read_length_prefixed(frame: &[u8], pos: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(frame, pos)?;
    let start = pos.checked_add(32).ok_or(AbiError::LengthOverflow)?;
    let end = start.checked_add(len).ok_or(AbiError::LengthOverflow)?;
    frame.get(start..end).ok_or(AbiError::OutOfBounds {
        offset: start,
        needed: len,
        have: frame.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn roundtrip(types: &[ParamType], tokens: Vec<Token>) {
        let data = encode(&tokens);
        let decoded = decode(types, &data).expect("decode");
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn static_roundtrip() {
        roundtrip(
            &[ParamType::Uint, ParamType::Bool, ParamType::Address],
            vec![
                Token::Uint(U256::from_u128(1u128 << 100)),
                Token::Bool(true),
                Token::Address(Address::new([7u8; 20])),
            ],
        );
    }

    #[test]
    fn string_roundtrip() {
        roundtrip(
            &[ParamType::Uint, ParamType::String],
            vec![
                Token::Uint(U256::from_u64(9)),
                Token::String("Daily Coding — 30 days".into()),
            ],
        );
    }

    #[test]
    fn array_of_dynamic_tuples_roundtrip() {
        let challenge_ty = ParamType::Tuple(vec![
            ParamType::Uint,
            ParamType::String,
            ParamType::Address,
        ]);
        let make = |id: u64, name: &str| {
            Token::Tuple(vec![
                Token::Uint(U256::from_u64(id)),
                Token::String(name.into()),
                Token::Address(Address::new([id as u8; 20])),
            ])
        };
        roundtrip(
            &[ParamType::Array(Box::new(challenge_ty))],
            vec![Token::Array(vec![make(0, "a"), make(1, "longer name here"), make(2, "")])],
        );
    }

    #[test]
    fn empty_array_roundtrip() {
        roundtrip(
            &[ParamType::Array(Box::new(ParamType::Uint))],
            vec![Token::Array(vec![])],
        );
    }

    #[test]
    fn bytes_roundtrip() {
        roundtrip(
            &[ParamType::Bytes],
            vec![Token::Bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01])],
        );
    }

    #[test]
    fn truncated_data_is_rejected() {
        let data = encode(&[Token::String("hello world".into())]);
        let err = decode(&[ParamType::String], &data[..40]).unwrap_err();
        assert!(matches!(err, AbiError::OutOfBounds { .. }));
    }

    #[test]
    fn wild_offset_is_rejected() {
        let mut data = encode(&[Token::String("hello".into())]);
        // Corrupt the offset word to point far past the end.
        data[24..32].copy_from_slice(&u64::MAX.to_be_bytes());
        assert!(decode(&[ParamType::String], &data).is_err());
    }

    #[test]
    fn oversized_array_length_is_rejected() {
        let mut data = encode(&[Token::Array(vec![Token::Uint(U256::ONE)])]);
        // Corrupt the length word (at offset 32) to claim a huge element count.
        data[56..64].copy_from_slice(&u64::MAX.to_be_bytes());
        let err = decode(&[ParamType::Array(Box::new(ParamType::Uint))], &data).unwrap_err();
        assert!(matches!(
            err,
            AbiError::Malformed { context: "array", .. } | AbiError::LengthOverflow
        ));
    }

    #[test]
    fn invalid_utf8_string_is_rejected() {
        let mut data = encode(&[Token::String("abcd".into())]);
        data[64] = 0xff; // first payload byte
        assert_eq!(decode(&[ParamType::String], &data).unwrap_err(), AbiError::InvalidUtf8);
    }
}

//! ABI encoding: selectors, event topics, and head/tail value encoding.

use crate::token::Token;
use strive_types::U256;
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 hash.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Four-byte function selector for a canonical signature like
/// `"joinChallenge(uint256)"`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// topic0 for an event signature like `"ChallengeJoined(uint256,address,uint256)"`.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// Full calldata: selector followed by the encoded arguments.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + args.len() * 32);
    out.extend_from_slice(&selector(signature));
    out.extend_from_slice(&encode(args));
    out
}

/// Encode a sequence of values as one head/tail frame.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let total_head: usize = tokens.iter().map(head_size).sum();
    let mut heads = Vec::with_capacity(total_head);
    let mut tail = Vec::new();

    for token in tokens {
        if is_dynamic(token) {
            heads.extend_from_slice(&usize_word(total_head + tail.len()));
            encode_tail(token, &mut tail);
        } else {
            encode_static(token, &mut heads);
        }
    }

    heads.extend_from_slice(&tail);
    heads
}

fn is_dynamic(token: &Token) -> bool {
    match token {
        Token::Uint(_) | Token::Address(_) | Token::Bool(_) => false,
        Token::String(_) | Token::Bytes(_) | Token::Array(_) => true,
        Token::Tuple(items) => items.iter().any(is_dynamic),
    }
}

fn head_size(token: &Token) -> usize {
    match token {
        Token::Tuple(items) if !is_dynamic(token) => items.iter().map(head_size).sum(),
        _ => 32,
    }
}

fn usize_word(offset: usize) -> [u8; 32] {
    U256::from_u64(offset as u64).to_be_bytes()
}

fn encode_static(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::Uint(v) => out.extend_from_slice(&v.to_be_bytes()),
        Token::Address(a) => {
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(a.as_bytes());
        }
        Token::Bool(b) => {
            let mut word = [0u8; 32];
            word[31] = *b as u8;
            out.extend_from_slice(&word);
        }
        Token::Tuple(items) => {
            for item in items {
                encode_static(item, out);
            }
        }
        // Dynamic tokens never reach here; encode() routes them to the tail.
        Token::String(_) | Token::Bytes(_) | Token::Array(_) => unreachable!(),
    }
}

fn encode_tail(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::String(s) => encode_byte_tail(s.as_bytes(), out),
        Token::Bytes(b) => encode_byte_tail(b, out),
        Token::Array(items) => {
            out.extend_from_slice(&usize_word(items.len()));
            out.extend_from_slice(&encode(items));
        }
        Token::Tuple(items) => out.extend_from_slice(&encode(items)),
        Token::Uint(_) | Token::Address(_) | Token::Bool(_) => unreachable!(),
    }
}

fn encode_byte_tail(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(bytes.len()));
    out.extend_from_slice(bytes);
    let padding = (32 - bytes.len() % 32) % 32;
    out.extend_from_slice(&vec![0u8; padding]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use strive_types::Address;

    #[test]
    fn selector_matches_known_value() {
        // keccak256("transfer(address,uint256)")[..4] is the canonical ERC-20
        // transfer selector.
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn static_args_encode_in_place() {
        let data = encode(&[
            Token::Uint(U256::from_u64(7)),
            Token::Bool(true),
        ]);
        assert_eq!(data.len(), 64);
        assert_eq!(data[31], 7);
        assert_eq!(data[63], 1);
    }

    #[test]
    fn address_is_left_padded() {
        let addr = Address::new([0xaa; 20]);
        let data = encode(&[Token::Address(addr)]);
        assert_eq!(&data[..12], &[0u8; 12]);
        assert_eq!(&data[12..32], &[0xaa; 20]);
    }

    #[test]
    fn string_arg_uses_offset_and_padding() {
        let data = encode(&[Token::String("abc".into())]);
        // offset word, length word, padded payload
        assert_eq!(data.len(), 96);
        assert_eq!(data[31], 32);
        assert_eq!(data[63], 3);
        assert_eq!(&data[64..67], b"abc");
        assert_eq!(&data[67..96], &[0u8; 29]);
    }

    #[test]
    fn mixed_static_and_dynamic_heads() {
        let data = encode(&[
            Token::Uint(U256::from_u64(1)),
            Token::String("hi".into()),
            Token::Uint(U256::from_u64(2)),
        ]);
        // Three head words, then the string tail at offset 96.
        assert_eq!(data[31], 1);
        assert_eq!(data[63], 96);
        assert_eq!(data[95], 2);
        assert_eq!(data[127], 2); // string length
        assert_eq!(&data[128..130], b"hi");
    }

    #[test]
    fn calldata_starts_with_selector() {
        let data = encode_call("joinChallenge(uint256)", &[Token::Uint(U256::from_u64(3))]);
        assert_eq!(&data[..4], &selector("joinChallenge(uint256)"));
        assert_eq!(data.len(), 36);
        assert_eq!(data[35], 3);
    }
}

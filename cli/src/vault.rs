//! Secret vault binding and maintenance commands.
//!
//! The vault is a small auxiliary contract holding named secrets that can
//! only be revealed after a configured longevity has elapsed since the
//! creator's last refresh.

use strive_abi::{encode_call, AbiError, ParamType, Token};
use strive_abi::decode::decode_single;
use strive_types::{Address, U256};

pub const SIG_CREATE_SECRET: &str = "createSecret(string,uint256,bytes)";
pub const SIG_REVEAL_SECRET: &str = "revealSecret(uint256)";
pub const SIG_GET_METAS: &str = "getMetas(uint256,uint256)";
pub const SIG_REFRESH_SECRETS: &str = "refreshSecrets()";

/// Public metadata of one stored secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretMeta {
    pub creator: Address,
    pub name: String,
    /// Seconds of creator inactivity before the secret becomes revealable.
    pub longevity: u64,
}

/// Handle on the secret vault contract at a fixed address.
#[derive(Clone, Debug)]
pub struct SecretVault {
    address: Address,
}

impl SecretVault {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn create_secret(&self, name: &str, longevity: u64, secret: &[u8]) -> Vec<u8> {
        encode_call(
            SIG_CREATE_SECRET,
            &[
                Token::String(name.to_string()),
                Token::Uint(U256::from_u64(longevity)),
                Token::Bytes(secret.to_vec()),
            ],
        )
    }

    pub fn reveal_secret(&self, index: u64) -> Vec<u8> {
        encode_call(SIG_REVEAL_SECRET, &[Token::Uint(U256::from_u64(index))])
    }

    pub fn get_metas(&self, offset: u64, count: u64) -> Vec<u8> {
        encode_call(
            SIG_GET_METAS,
            &[
                Token::Uint(U256::from_u64(offset)),
                Token::Uint(U256::from_u64(count)),
            ],
        )
    }

    pub fn refresh_secrets(&self) -> Vec<u8> {
        encode_call(SIG_REFRESH_SECRETS, &[])
    }

    pub fn decode_metas(data: &[u8]) -> Result<Vec<SecretMeta>, AbiError> {
        let meta_ty = ParamType::Tuple(vec![
            ParamType::Address,
            ParamType::String,
            ParamType::Uint,
        ]);
        let array = decode_single(&ParamType::Array(Box::new(meta_ty)), data)?.into_array()?;
        array
            .into_iter()
            .map(|token| {
                let mut fields = token.into_tuple()?;
                if fields.len() != 3 {
                    return Err(AbiError::Malformed {
                        context: "secret meta",
                        detail: format!("expected 3 fields, got {}", fields.len()),
                    });
                }
                let longevity = fields.pop().expect("len checked").into_u64()?;
                let name = fields.pop().expect("len checked").into_string()?;
                let creator = fields.pop().expect("len checked").into_address()?;
                Ok(SecretMeta {
                    creator,
                    name,
                    longevity,
                })
            })
            .collect()
    }

    pub fn decode_secret(data: &[u8]) -> Result<Vec<u8>, AbiError> {
        decode_single(&ParamType::Bytes, data)?.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strive_abi::{encode, selector};

    #[test]
    fn create_secret_calldata_layout() {
        let vault = SecretVault::new(Address::ZERO);
        let data = vault.create_secret("will", 3600, b"attic key");
        assert_eq!(&data[..4], &selector(SIG_CREATE_SECRET));
        // Three head words follow the selector.
        assert_eq!(data[4..].len() % 32, 0);
    }

    #[test]
    fn metas_roundtrip() {
        let metas = vec![
            SecretMeta {
                creator: Address::new([0x0a; 20]),
                name: "will".into(),
                longevity: 3600,
            },
            SecretMeta {
                creator: Address::new([0x0b; 20]),
                name: "deed".into(),
                longevity: 86400,
            },
        ];
        let tokens: Vec<Token> = metas
            .iter()
            .map(|m| {
                Token::Tuple(vec![
                    Token::Address(m.creator),
                    Token::String(m.name.clone()),
                    Token::Uint(U256::from_u64(m.longevity)),
                ])
            })
            .collect();
        let data = encode(&[Token::Array(tokens)]);
        assert_eq!(SecretVault::decode_metas(&data).unwrap(), metas);
    }

    #[test]
    fn secret_roundtrip() {
        let data = encode(&[Token::Bytes(b"hunter2".to_vec())]);
        assert_eq!(SecretVault::decode_secret(&data).unwrap(), b"hunter2");
    }
}

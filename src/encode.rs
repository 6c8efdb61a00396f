//! Canonical byte encoding of leaf values.
//!
//! Identifier strings are ambiguous: `0x5B38...` and `0x5b38...` name the
//! same address but hash differently if fed as text, and a hex string can be
//! hashed either as its characters or as the bytes it spells. The encoder
//! makes both choices explicit. Case normalization runs first, then the
//! string encoding.
//!
//! ```text
//! leaf_hash(v) = H(encode(normalize(v)))
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::hash::{Algorithm, Hash};
use crate::ser::{decode_hex_bytes, strip_hex_prefix};

/// Letter case applied to string values before encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseNormalization {
    /// Hash the string exactly as supplied.
    #[default]
    Preserve,
    /// Lower-case ASCII letters.
    Lower,
    /// Upper-case ASCII letters.
    Upper,
}

/// How a (normalized) string becomes bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringEncoding {
    /// The UTF-8 bytes of the text.
    #[default]
    Utf8,
    /// The bytes spelled by hex digits, with an optional `0x`/`0X` prefix.
    /// An odd digit count is padded with a leading zero.
    Hex,
    /// Hex-decode strings made of a lower-case `0x` prefix followed by hex
    /// digits, take every other string as UTF-8 text.
    ///
    /// This is the rule of the JavaScript `keccak256` helper commonly paired
    /// with merkle whitelists: `0X`-prefixed input is hashed as text.
    Auto,
}

/// A static ABI value, encoded as one 32-byte big-endian word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// 20-byte account address, left padded with zeroes.
    Address([u8; 20]),
    /// Unsigned integer, left padded with zeroes.
    Uint(u128),
    /// Boolean as `0` or `1`.
    Bool(bool),
    /// Raw 32-byte word, copied unchanged.
    Word(Hash),
}

impl Token {
    /// Parses a hex address with an optional `0x`/`0X` prefix. Letter case
    /// of the digits is ignored.
    pub fn address(s: &str) -> Result<Token> {
        let bytes = decode_hex_bytes(strip_hex_prefix(s))?;
        let mut addr = [0u8; 20];
        if bytes.len() != addr.len() {
            return Err(DecodeError::InvalidLength {
                expected: addr.len(),
                actual: bytes.len(),
            }
            .into());
        }
        addr.copy_from_slice(&bytes);
        Ok(Token::Address(addr))
    }

    fn word(&self) -> Hash {
        let mut word = [0u8; 32];
        match self {
            Token::Address(addr) => word[12..].copy_from_slice(addr),
            Token::Uint(n) => word[16..].copy_from_slice(&n.to_be_bytes()),
            Token::Bool(b) => word[31] = u8::from(*b),
            Token::Word(w) => word = *w,
        }
        word
    }
}

/// Concatenated 32-byte words of `tokens`, as `abi.encode` lays out a tuple
/// of static types.
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tokens.len() * 32);
    for token in tokens {
        out.extend_from_slice(&token.word());
    }
    out
}

/// A leaf: input value, its canonical bytes and the hash committed to by
/// layer 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    value: String,
    bytes: Vec<u8>,
    hash: Hash,
}

impl Leaf {
    /// Hashes already canonical `bytes`. `value` is kept for display only.
    pub fn from_bytes<A: Algorithm>(alg: &mut A, value: String, bytes: Vec<u8>) -> Leaf {
        let hash = alg.digest(&bytes);
        Leaf { value, bytes, hash }
    }

    /// The value as supplied by the caller.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical encoding of the value.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hash of the canonical encoding.
    pub fn hash(&self) -> Hash {
        self.hash
    }
}

/// Turns input values into canonical bytes and leaf hashes.
///
/// The default (`Preserve`, `Utf8`) hashes strings byte for byte as they
/// were written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafEncoder {
    /// Case applied before encoding.
    pub case: CaseNormalization,
    /// String to bytes rule.
    pub encoding: StringEncoding,
}

impl LeafEncoder {
    /// Creates an encoder with both rules given explicitly.
    pub fn new(case: CaseNormalization, encoding: StringEncoding) -> LeafEncoder {
        LeafEncoder { case, encoding }
    }

    /// Applies the case rule.
    pub fn normalize<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.case {
            CaseNormalization::Preserve => Cow::Borrowed(value),
            CaseNormalization::Lower => Cow::Owned(value.to_ascii_lowercase()),
            CaseNormalization::Upper => Cow::Owned(value.to_ascii_uppercase()),
        }
    }

    /// Canonical bytes of `value`.
    pub fn encode(&self, value: &str) -> Result<Vec<u8>> {
        let value = self.normalize(value);
        match self.encoding {
            StringEncoding::Utf8 => Ok(value.as_bytes().to_vec()),
            StringEncoding::Hex => Ok(decode_hex_bytes(strip_hex_prefix(&value))?),
            StringEncoding::Auto => match value.strip_prefix("0x") {
                Some(digits) if digits.bytes().all(|b| b.is_ascii_hexdigit()) => {
                    Ok(decode_hex_bytes(digits)?)
                }
                _ => Ok(value.as_bytes().to_vec()),
            },
        }
    }

    /// `H(encode(value))`.
    pub fn leaf_hash<A: Algorithm>(&self, alg: &mut A, value: &str) -> Result<Hash> {
        let bytes = self.encode(value)?;
        Ok(alg.digest(&bytes))
    }

    /// Full leaf record for `value`.
    pub fn leaf<A: Algorithm>(&self, alg: &mut A, value: &str) -> Result<Leaf> {
        let bytes = self.encode(value)?;
        Ok(Leaf::from_bytes(alg, value.to_owned(), bytes))
    }

    /// Leaf record for an ABI token tuple; its value is the hex encoding.
    pub fn token_leaf<A: Algorithm>(&self, alg: &mut A, tokens: &[Token]) -> Leaf {
        let bytes = encode_tokens(tokens);
        Leaf::from_bytes(alg, format!("0x{}", hex::encode(&bytes)), bytes)
    }
}

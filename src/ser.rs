//! Hex and byte renderings of hashes, proofs and trees.
//!
//! Hashes are written as `0x` followed by 64 lower-case hex digits. Parsing
//! accepts either prefix case, no prefix, and digits of either case.
//!
//! The compact proof encoding is a plain concatenation of elements:
//!
//! ```text
//! [ pos(1) sibling(32) ] [ pos(1) sibling(32) ] ...
//! ```
//!
//! where `pos` is `0` for [`Position::Left`] and `1` for [`Position::Right`].

use std::fmt;

use crate::error::DecodeError;
use crate::hash::{Hash, HASH_LEN};
use crate::merkle::MerkleTree;
use crate::proof::{Position, Proof, ProofElement};

/// Size in bytes of one element in the compact proof encoding.
pub const PROOF_ELEMENT_LEN: usize = 1 + HASH_LEN;

/// Displays a byte slice as `0x`-prefixed lower-case hex.
#[derive(Debug, Clone, Copy)]
pub struct HexSlice<'a>(&'a [u8]);

impl<'a> HexSlice<'a> {
    /// Wraps anything byte-like.
    pub fn new<T>(data: &'a T) -> HexSlice<'a>
    where
        T: ?Sized + AsRef<[u8]> + 'a,
    {
        HexSlice(data.as_ref())
    }
}

impl fmt::Display for HexSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// `0x`-prefixed hex of `hash`.
pub fn to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Hex of `hash` without a prefix.
pub fn to_bare_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parses a hash written by [`to_hex`] or [`to_bare_hex`].
pub fn from_hex(s: &str) -> Result<Hash, DecodeError> {
    let bytes = hex::decode(strip_hex_prefix(s))?;
    if bytes.len() != HASH_LEN {
        return Err(DecodeError::InvalidLength {
            expected: HASH_LEN,
            actual: bytes.len(),
        });
    }
    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

/// Drops a leading `0x` or `0X`.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes hex digits, padding an odd count with a leading zero nibble.
pub(crate) fn decode_hex_bytes(digits: &str) -> Result<Vec<u8>, DecodeError> {
    if digits.len() % 2 == 1 {
        Ok(hex::decode(format!("0{}", digits))?)
    } else {
        Ok(hex::decode(digits)?)
    }
}

/// Serde adapter writing a [`Hash`] as a `0x` hex string.
///
/// ```text
/// #[serde(with = "merkle_generator::ser::hex_hash")]
/// root: Hash,
/// ```
pub mod hex_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::hash::Hash;

    /// Serializes `hash` as `0x` hex.
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(hash))
    }

    /// Parses a hex string into a hash.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Position {
    /// Inverse of [`Position::to_byte`].
    pub fn from_byte(b: u8) -> Result<Position, DecodeError> {
        match b {
            0 => Ok(Position::Left),
            1 => Ok(Position::Right),
            other => Err(DecodeError::InvalidPosition(other)),
        }
    }
}

impl Proof {
    /// Compact byte encoding, [`PROOF_ELEMENT_LEN`] bytes per element.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * PROOF_ELEMENT_LEN);
        for e in self {
            out.push(e.position.to_byte());
            out.extend_from_slice(&e.sibling);
        }
        out
    }

    /// Parses the compact byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Proof, DecodeError> {
        if bytes.len() % PROOF_ELEMENT_LEN != 0 {
            return Err(DecodeError::TruncatedProof { len: bytes.len() });
        }
        let elements = bytes
            .chunks(PROOF_ELEMENT_LEN)
            .map(|chunk| {
                let position = Position::from_byte(chunk[0])?;
                let mut sibling = [0u8; HASH_LEN];
                sibling.copy_from_slice(&chunk[1..]);
                Ok(ProofElement::new(sibling, position))
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Proof::new(elements))
    }

    /// `0x` hex of each sibling, leaf side first.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.into_iter().map(|e| to_hex(&e.sibling)).collect()
    }

    /// Rebuilds a proof from sibling hex strings and their positions.
    pub fn from_hex_strings<S: AsRef<str>>(
        siblings: &[S],
        positions: &[Position],
    ) -> Result<Proof, DecodeError> {
        if siblings.len() != positions.len() {
            return Err(DecodeError::InvalidLength {
                expected: siblings.len(),
                actual: positions.len(),
            });
        }
        let elements = siblings
            .iter()
            .zip(positions)
            .map(|(s, &p)| Ok(ProofElement::new(from_hex(s.as_ref())?, p)))
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Proof::new(elements))
    }
}

impl fmt::Display for Proof {
    /// One line per element: index, sibling side, sibling hash.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.into_iter().enumerate() {
            writeln!(f, "{:>3} {:<5} {}", i, e.position, HexSlice::new(&e.sibling))?;
        }
        Ok(())
    }
}

impl MerkleTree {
    /// `0x` hex of the root.
    pub fn hex_root(&self) -> String {
        to_hex(&self.root())
    }

    /// `0x` hex of every node, leaves first.
    pub fn hex_layers(&self) -> Vec<Vec<String>> {
        self.layers()
            .iter()
            .map(|layer| layer.iter().map(to_hex).collect())
            .collect()
    }

    /// `0x` hex siblings of the proof for `leaf`, the form accepted by
    /// sorted-pair contract verifiers.
    pub fn hex_proof(&self, leaf: &Hash) -> crate::error::Result<Vec<String>> {
        Ok(self.gen_proof(leaf)?.to_hex_strings())
    }
}

impl fmt::Display for MerkleTree {
    /// Per-layer dump, root layer first, nodes indented under their layer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options();
        writeln!(
            f,
            "MerkleTree leaves={} depth={} hash={} sort_pairs={} odd_nodes={}",
            self.leaf_count(),
            self.depth(),
            options.hash_algorithm,
            options.sort_pairs,
            options.odd_node_policy
        )?;
        for (i, layer) in self.layers().iter().enumerate().rev() {
            writeln!(f, "layer {}:", i)?;
            for (j, node) in layer.iter().enumerate() {
                writeln!(f, "  {:>4}: {}", j, HexSlice::new(node))?;
            }
        }
        Ok(())
    }
}

//! Hash infrastructure for nodes in the merkle tree.
//!
//! Every backend is a streaming [`Algorithm`]: bytes are fed through the
//! standard [`Hasher`] interface and the full 256-bit digest is read back
//! with [`Algorithm::hash`]. [`HashPrimitive`] dispatches to the backend
//! selected by a [`HashAlgorithm`] value, so the digest is chosen by
//! configuration rather than by type.

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher as _, Keccak, Sha3};

/// Length in bytes of every digest produced by the crate.
pub const HASH_LEN: usize = 32;

/// A fixed-width digest. Layer nodes, roots and proof siblings are all hashes.
pub type Hash = [u8; HASH_LEN];

/// Hashing algorithm type.
///
/// Algorithm conforms standard [`Hasher`] trait and provides methods to return
/// full length hash and reset current state.
pub trait Algorithm: Hasher + Clone + Send + Sync {
    /// Returns the hash value for the data stream written so far.
    fn hash(&mut self) -> Hash;

    /// Reset Hasher state.
    fn reset(&mut self);

    /// Returns the digest of `data` alone.
    fn digest(&mut self, data: &[u8]) -> Hash {
        self.reset();
        self.write(data);
        self.hash()
    }

    /// Returns the digest of `left || right`.
    ///
    /// No domain separation prefix is written: interior nodes must match
    /// verifiers that hash the bare 64-byte concatenation.
    fn node(&mut self, left: &Hash, right: &Hash) -> Hash {
        self.reset();
        self.write(left);
        self.write(right);
        self.hash()
    }

    /// Returns the digest of the pair concatenated in ascending byte order,
    /// so that `sorted_node(a, b) == sorted_node(b, a)`.
    fn sorted_node(&mut self, a: &Hash, b: &Hash) -> Hash {
        if a < b {
            self.node(a, b)
        } else {
            self.node(b, a)
        }
    }
}

fn finish_u64(h: Hash) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&h[..8]);
    u64::from_be_bytes(head)
}

/// Keccak-256 as used by the EVM (original Keccak padding, not SHA3).
#[derive(Clone)]
pub struct Keccak256Algorithm(Keccak);

impl Keccak256Algorithm {
    /// Creates a fresh Keccak-256 state.
    pub fn new() -> Keccak256Algorithm {
        Keccak256Algorithm(Keccak::v256())
    }
}

impl Default for Keccak256Algorithm {
    fn default() -> Keccak256Algorithm {
        Keccak256Algorithm::new()
    }
}

impl fmt::Debug for Keccak256Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Keccak256Algorithm")
    }
}

impl Hasher for Keccak256Algorithm {
    #[inline]
    fn write(&mut self, msg: &[u8]) {
        self.0.update(msg)
    }

    #[inline]
    fn finish(&self) -> u64 {
        finish_u64(self.clone().hash())
    }
}

impl Algorithm for Keccak256Algorithm {
    /// `Keccak::finalize` consumes the state, so the running state is
    /// cloned and left untouched.
    #[inline]
    fn hash(&mut self) -> Hash {
        let mut h = [0u8; HASH_LEN];
        self.0.clone().finalize(&mut h);
        h
    }

    #[inline]
    fn reset(&mut self) {
        self.0 = Keccak::v256();
    }
}

/// SHA-256 (FIPS 180-4).
#[derive(Clone, Default)]
pub struct Sha256Algorithm(Sha256);

impl Sha256Algorithm {
    /// Creates a fresh SHA-256 state.
    pub fn new() -> Sha256Algorithm {
        Sha256Algorithm(Sha256::new())
    }
}

impl fmt::Debug for Sha256Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sha256Algorithm")
    }
}

impl Hasher for Sha256Algorithm {
    #[inline]
    fn write(&mut self, msg: &[u8]) {
        Digest::update(&mut self.0, msg)
    }

    #[inline]
    fn finish(&self) -> u64 {
        finish_u64(self.clone().hash())
    }
}

impl Algorithm for Sha256Algorithm {
    #[inline]
    fn hash(&mut self) -> Hash {
        let mut h = [0u8; HASH_LEN];
        h.copy_from_slice(&self.0.clone().finalize());
        h
    }

    #[inline]
    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }
}

/// SHA3-256 (FIPS 202).
#[derive(Clone)]
pub struct Sha3Algorithm(Sha3);

impl Sha3Algorithm {
    /// Creates a fresh SHA3-256 state.
    pub fn new() -> Sha3Algorithm {
        Sha3Algorithm(Sha3::v256())
    }
}

impl Default for Sha3Algorithm {
    fn default() -> Sha3Algorithm {
        Sha3Algorithm::new()
    }
}

impl fmt::Debug for Sha3Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sha3Algorithm")
    }
}

impl Hasher for Sha3Algorithm {
    #[inline]
    fn write(&mut self, msg: &[u8]) {
        self.0.update(msg)
    }

    #[inline]
    fn finish(&self) -> u64 {
        finish_u64(self.clone().hash())
    }
}

impl Algorithm for Sha3Algorithm {
    #[inline]
    fn hash(&mut self) -> Hash {
        let mut h = [0u8; HASH_LEN];
        self.0.clone().finalize(&mut h);
        h
    }

    #[inline]
    fn reset(&mut self) {
        self.0 = Sha3::v256();
    }
}

/// Digest selection, recorded in the tree options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// Keccak-256, the EVM `keccak256`.
    #[default]
    #[serde(rename = "keccak256")]
    Keccak256,
    /// SHA-256.
    #[serde(rename = "sha256")]
    Sha256,
    /// SHA3-256.
    #[serde(rename = "sha3-256")]
    Sha3_256,
}

impl HashAlgorithm {
    /// Canonical lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha3_256 => "sha3-256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak-256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            "sha256" | "sha-256" | "sha2-256" => Ok(HashAlgorithm::Sha256),
            "sha3-256" | "sha3_256" | "sha3" => Ok(HashAlgorithm::Sha3_256),
            other => Err(format!("unknown hash algorithm `{}`", other)),
        }
    }
}

/// Runtime-selected digest backend.
///
/// Built from a [`HashAlgorithm`] and passed explicitly into tree
/// construction and proof verification.
#[derive(Clone, Debug)]
pub enum HashPrimitive {
    /// Keccak-256 backend.
    Keccak256(Keccak256Algorithm),
    /// SHA-256 backend.
    Sha256(Sha256Algorithm),
    /// SHA3-256 backend.
    Sha3_256(Sha3Algorithm),
}

impl HashPrimitive {
    /// Creates a fresh state for `algorithm`.
    pub fn new(algorithm: HashAlgorithm) -> HashPrimitive {
        match algorithm {
            HashAlgorithm::Keccak256 => HashPrimitive::Keccak256(Keccak256Algorithm::new()),
            HashAlgorithm::Sha256 => HashPrimitive::Sha256(Sha256Algorithm::new()),
            HashAlgorithm::Sha3_256 => HashPrimitive::Sha3_256(Sha3Algorithm::new()),
        }
    }

    /// Which digest this primitive computes.
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            HashPrimitive::Keccak256(_) => HashAlgorithm::Keccak256,
            HashPrimitive::Sha256(_) => HashAlgorithm::Sha256,
            HashPrimitive::Sha3_256(_) => HashAlgorithm::Sha3_256,
        }
    }
}

impl Default for HashPrimitive {
    fn default() -> HashPrimitive {
        HashPrimitive::new(HashAlgorithm::default())
    }
}

impl From<HashAlgorithm> for HashPrimitive {
    fn from(algorithm: HashAlgorithm) -> HashPrimitive {
        HashPrimitive::new(algorithm)
    }
}

impl Hasher for HashPrimitive {
    #[inline]
    fn write(&mut self, msg: &[u8]) {
        match self {
            HashPrimitive::Keccak256(a) => a.write(msg),
            HashPrimitive::Sha256(a) => a.write(msg),
            HashPrimitive::Sha3_256(a) => a.write(msg),
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        match self {
            HashPrimitive::Keccak256(a) => a.finish(),
            HashPrimitive::Sha256(a) => a.finish(),
            HashPrimitive::Sha3_256(a) => a.finish(),
        }
    }
}

impl Algorithm for HashPrimitive {
    #[inline]
    fn hash(&mut self) -> Hash {
        match self {
            HashPrimitive::Keccak256(a) => a.hash(),
            HashPrimitive::Sha256(a) => a.hash(),
            HashPrimitive::Sha3_256(a) => a.hash(),
        }
    }

    #[inline]
    fn reset(&mut self) {
        match self {
            HashPrimitive::Keccak256(a) => a.reset(),
            HashPrimitive::Sha256(a) => a.reset(),
            HashPrimitive::Sha3_256(a) => a.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_digest(algorithm: HashAlgorithm, data: &[u8]) -> String {
        hex::encode(HashPrimitive::new(algorithm).digest(data))
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            hex_digest(HashAlgorithm::Keccak256, b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Keccak256, b"abc"),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex_digest(HashAlgorithm::Sha3_256, b"abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        for algorithm in [
            HashAlgorithm::Keccak256,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha3_256,
        ] {
            let mut a = HashPrimitive::new(algorithm);
            a.write(b"a");
            a.write(b"bc");
            let streamed = a.hash();
            // reading the hash does not disturb the stream
            assert_eq!(a.hash(), streamed);
            assert_eq!(a.digest(b"abc"), streamed);
        }
    }

    #[test]
    fn test_reset() {
        let mut a = Keccak256Algorithm::new();
        a.write(b"garbage");
        a.reset();
        assert_eq!(a.hash(), Keccak256Algorithm::new().digest(b""));
    }

    #[test]
    fn test_node_is_plain_concatenation() {
        let mut a = HashPrimitive::default();
        let l = a.digest(b"left");
        let r = a.digest(b"right");
        let mut concat = l.to_vec();
        concat.extend_from_slice(&r);
        assert_eq!(a.node(&l, &r), a.digest(&concat));
        assert_ne!(a.node(&l, &r), a.node(&r, &l));
    }

    #[test]
    fn test_sorted_node_is_symmetric() {
        let mut a = HashPrimitive::default();
        let l = a.digest(b"left");
        let r = a.digest(b"right");
        assert_eq!(a.sorted_node(&l, &r), a.sorted_node(&r, &l));
        let (lo, hi) = if l < r { (l, r) } else { (r, l) };
        assert_eq!(a.sorted_node(&l, &r), a.node(&lo, &hi));
        assert_eq!(a.sorted_node(&l, &l), a.node(&l, &l));
    }

    #[test]
    fn test_finish_is_digest_prefix() {
        let mut a = Sha256Algorithm::new();
        a.write(b"abc");
        assert_eq!(a.finish(), 0xba78_16bf_8f01_cfea);
    }

    #[test]
    fn test_algorithm_names() {
        for algorithm in [
            HashAlgorithm::Keccak256,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha3_256,
        ] {
            assert_eq!(algorithm.name().parse::<HashAlgorithm>(), Ok(algorithm));
            assert_eq!(HashPrimitive::new(algorithm).algorithm(), algorithm);
        }
        assert_eq!("KECCAK".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Keccak256));
        assert!("md5".parse::<HashAlgorithm>().is_err());
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Keccak256);
    }
}

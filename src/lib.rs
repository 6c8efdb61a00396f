//! Sorted-pair _Merkle Tree_ generator.
//!
//! Builds a Merkle tree (MT) over an ordered list of leaves, kept as a vec
//! of layers of fixed size 32-byte hashes, and produces inclusion proofs
//! that verify byte for byte against contract-side verifiers such as
//! OpenZeppelin's `MerkleProof` (whitelists, airdrops).
//!
//! Pair hashing follows the sorted-pair scheme by default:
//!
//! ```text
//! node(a, b) = H(min(a, b) || max(a, b))
//! ```
//!
//! where `min`/`max` compare the raw bytes. Leaves carry no prefix and
//! interior nodes carry no prefix. An unpaired trailing node is carried to
//! the next layer unchanged unless the duplicate-last policy is selected.
//!
//! Link: [](https://en.wikipedia.org/wiki/Merkle_tree)
//!
//! # Interface
//!
//! ```text
//! - encode (value) -> leaf
//! - build_tree (leaves, options) -> tree
//! - root -> hash
//! - gen_proof (leaf) -> proof
//! - verify (leaf, proof, root, sort_pairs) -> bool
//! - to_hex / from_hex
//! ```
//!
//! # Quick start
//!
//! ```
//! use merkle_generator::{verify, HashPrimitive, LeafEncoder, MerkleTree, TreeOptions};
//!
//! let options = TreeOptions::default();
//! let whitelist = [
//!     "0X5B38DA6A701C568545DCFCB03FCB875F56BEDDC4",
//!     "0X5A641E5FB72A2FD9137312E7694D42996D689D99",
//! ];
//! let tree = MerkleTree::from_data(whitelist, &LeafEncoder::default(), options).unwrap();
//!
//! let leaf = tree.leaves()[0].hash();
//! let proof = tree.gen_proof(&leaf).unwrap();
//!
//! let mut h = HashPrimitive::new(options.hash_algorithm);
//! assert!(verify(&mut h, &leaf, &proof, &tree.root(), options.sort_pairs));
//! println!("{}", tree.hex_root());
//! ```

#![deny(
    missing_docs,
    unused_qualifications,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces
)]

/// Leaf value canonicalization.
pub mod encode;

/// Error types.
pub mod error;

/// Hash infrastructure for nodes in the merkle tree.
pub mod hash;

/// Merkle tree construction and proof generation.
pub mod merkle;

/// Tree construction options.
pub mod options;

/// Merkle tree inclusion proof.
pub mod proof;

/// Hex, byte and text renderings.
pub mod ser;

#[cfg(test)]
mod test_common;

pub use encode::{CaseNormalization, Leaf, LeafEncoder, StringEncoding, Token};
pub use error::{DecodeError, MerkleError, Result};
pub use hash::{Algorithm, Hash, HashAlgorithm, HashPrimitive, HASH_LEN};
pub use merkle::{MerkleTree, Node};
pub use options::{OddNodePolicy, TreeOptions};
pub use proof::{verify, Position, Proof, ProofElement};
pub use ser::{from_hex, to_hex};

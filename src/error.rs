use crate::hash::Hash;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, MerkleError>;

/// Errors raised while building trees and generating proofs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MerkleError {
    /// The tree was asked to commit to zero leaves.
    #[error("cannot build a merkle tree without leaves")]
    EmptyInput,

    /// A proof was requested for a leaf hash that is not in layer 0.
    #[error("leaf 0x{} is not part of the tree", hex::encode(.0))]
    LeafNotFound(Hash),

    /// A proof was requested for a leaf position past the end of layer 0.
    #[error("leaf index {index} is out of bounds (leaves: {leaves})")]
    IndexOutOfRange {
        /// Requested leaf position.
        index: usize,
        /// Number of leaves in the tree.
        leaves: usize,
    },

    /// Malformed serialized input.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors raised while parsing hex strings or proof bytes.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The string contains non-hex characters.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded value does not have the size of a hash.
    #[error("invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes found.
        actual: usize,
    },

    /// A proof element carries a position byte other than 0 or 1.
    #[error("invalid proof position marker {0:#04x}")]
    InvalidPosition(u8),

    /// Proof bytes end in the middle of an element.
    #[error("truncated proof: {len} bytes is not a multiple of the element size")]
    TruncatedProof {
        /// Length of the rejected byte string.
        len: usize,
    },
}

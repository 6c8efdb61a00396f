use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::{Algorithm, Hash};

/// Side of the sibling relative to the node on the proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Sibling precedes the path node.
    Left,
    /// Sibling follows the path node.
    Right,
}

impl Position {
    /// Marker byte used by the compact proof encoding.
    pub fn to_byte(self) -> u8 {
        match self {
            Position::Left => 0,
            Position::Right => 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Position::Left => "left",
            Position::Right => "right",
        })
    }
}

/// One step of a proof: the sibling hash at some layer and its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofElement {
    /// Hash paired with the path node.
    #[serde(with = "crate::ser::hex_hash")]
    pub sibling: Hash,
    /// Side of `sibling`.
    pub position: Position,
}

impl ProofElement {
    /// Creates a proof step.
    pub fn new(sibling: Hash, position: Position) -> ProofElement {
        ProofElement { sibling, position }
    }
}

/// Merkle tree inclusion proof for a single leaf.
///
/// Layout, leaf to root:
///
/// ```text
/// [ (s0, p0) (s1, p1) ... ]
/// ```
///
/// Layers where the path node was carried forward without a partner add no
/// element, so a proof can be shorter than the tree depth. A proof does not
/// reference its tree: verification needs only the leaf, the expected root
/// and the pairing rule the tree was built with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof {
    elements: Vec<ProofElement>,
}

impl Proof {
    /// Creates a proof from its elements, leaf side first.
    pub fn new(elements: Vec<ProofElement>) -> Proof {
        Proof { elements }
    }

    /// Proof steps, leaf side first.
    pub fn elements(&self) -> &[ProofElement] {
        &self.elements
    }

    /// Sibling hashes without positions, the shape sorted-pair verifiers
    /// such as OpenZeppelin's `MerkleProof` consume.
    pub fn siblings(&self) -> Vec<Hash> {
        self.elements.iter().map(|e| e.sibling).collect()
    }

    /// Number of proof steps.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Folds `leaf` with every sibling and returns the resulting root.
    ///
    /// With `sort_pairs` each step hashes the two values in ascending byte
    /// order and positions are ignored; otherwise a `Right` sibling is
    /// appended and a `Left` sibling prepended.
    pub fn compute_root<A: Algorithm>(&self, alg: &mut A, leaf: &Hash, sort_pairs: bool) -> Hash {
        let mut h = *leaf;
        for e in &self.elements {
            h = if sort_pairs {
                alg.sorted_node(&h, &e.sibling)
            } else {
                match e.position {
                    Position::Right => alg.node(&h, &e.sibling),
                    Position::Left => alg.node(&e.sibling, &h),
                }
            };
        }
        h
    }

    /// Verifies MT inclusion proof of `leaf` under `root`.
    pub fn validate<A: Algorithm>(
        &self,
        alg: &mut A,
        leaf: &Hash,
        root: &Hash,
        sort_pairs: bool,
    ) -> bool {
        self.compute_root(alg, leaf, sort_pairs) == *root
    }
}

impl From<Vec<ProofElement>> for Proof {
    fn from(elements: Vec<ProofElement>) -> Proof {
        Proof::new(elements)
    }
}

impl<'a> IntoIterator for &'a Proof {
    type Item = &'a ProofElement;
    type IntoIter = std::slice::Iter<'a, ProofElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Checks that `proof` leads from `leaf` to `expected_root`.
///
/// `sort_pairs` must be the rule the tree was built with. A mismatch is not
/// detectable and simply yields `false`.
pub fn verify<A: Algorithm>(
    alg: &mut A,
    leaf: &Hash,
    proof: &Proof,
    expected_root: &Hash,
    sort_pairs: bool,
) -> bool {
    proof.validate(alg, leaf, expected_root, sort_pairs)
}

use log::{debug, trace};
use rayon::prelude::*;

use crate::encode::{Leaf, LeafEncoder};
use crate::error::{MerkleError, Result};
use crate::hash::{Algorithm, Hash};
use crate::options::{OddNodePolicy, TreeOptions};
use crate::proof::{Position, Proof, ProofElement};

/// Layer width (number of nodes) above which pairs are hashed on the rayon
/// pool. Narrower layers are hashed on the calling thread.
pub const SMALL_LAYER_BUILD: usize = 1024;

/// Merkle Tree.
///
/// Every layer is stored as its own vec, leaves first and the root last.
///
/// ```text
///         root = h1234 = h(h12 + h34)
///        /                           \
///  h12 = h(h1 + h2)            h34 = h(h3 + h4)
///   /            \              /            \
/// h1 = h(tx1)  h2 = h(tx2)    h3 = h(tx3)  h4 = h(tx4)
/// ```
///
/// In memory layout:
///
/// ```text
///     [[h1 h2 h3 h4] [h12 h34] [root]]
/// ```
///
/// With sorted pairs (the default) `h12 = h(min(h1, h2) + max(h1, h2))`.
///
/// The number of leaves is not always a power of two. Under
/// [`OddNodePolicy::CarryForward`] the last node of an odd layer moves up
/// unchanged:
///
/// ```text
///     [[h1 h2 h3] [h12 h3] [root = h(h12 + h3)]]
/// ```
///
/// Under [`OddNodePolicy::DuplicateLast`] it is hashed with itself, giving
/// `[[h1 h2 h3] [h12 h33] [root]]`. Either way every layer has
/// `ceil(len / 2)` nodes of the layer below.
///
/// The tree is immutable; the options it was built with are kept so that
/// its proofs are verified with the same rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash>>,
    leaves: Vec<Leaf>,
    options: TreeOptions,
}

/// A hash at a given layer and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Layer index, 0 for leaves.
    pub layer: usize,
    /// Position within the layer.
    pub position: usize,
    /// Node hash.
    pub hash: Hash,
}

/// Hashes the pair `(left, right)` found at consecutive positions of a layer.
#[inline]
pub fn pair_hash<A: Algorithm>(alg: &mut A, left: &Hash, right: &Hash, sort_pairs: bool) -> Hash {
    if sort_pairs {
        alg.sorted_node(left, right)
    } else {
        alg.node(left, right)
    }
}

#[inline]
fn reduce_chunk<A: Algorithm>(alg: &mut A, chunk: &[Hash], options: &TreeOptions) -> Hash {
    match chunk {
        [left, right] => pair_hash(alg, left, right, options.sort_pairs),
        [last] => match options.odd_node_policy {
            OddNodePolicy::CarryForward => *last,
            OddNodePolicy::DuplicateLast => pair_hash(alg, last, last, options.sort_pairs),
        },
        _ => unreachable!("layers are processed in chunks of two"),
    }
}

/// Derives the layer above `layer`.
pub fn next_layer<A: Algorithm>(alg: &mut A, layer: &[Hash], options: &TreeOptions) -> Vec<Hash> {
    if layer.len() <= SMALL_LAYER_BUILD {
        return layer
            .chunks(2)
            .map(|chunk| reduce_chunk(alg, chunk, options))
            .collect();
    }

    // Pairs are independent; collect keeps them in layer order.
    let proto = alg.clone();
    layer
        .par_chunks(2)
        .map_init(
            || proto.clone(),
            |a, chunk| reduce_chunk(a, chunk, options),
        )
        .collect()
}

impl MerkleTree {
    /// Creates new merkle tree from a sequence of leaf hashes.
    pub fn new<I: IntoIterator<Item = Hash>>(leaves: I, options: TreeOptions) -> Result<MerkleTree> {
        let layer: Vec<Hash> = leaves.into_iter().collect();
        let layers = Self::build(layer, &options)?;
        Ok(MerkleTree {
            layers,
            leaves: Vec::new(),
            options,
        })
    }

    /// Creates new merkle tree from leaf records, which the tree keeps.
    pub fn from_leaves(leaves: Vec<Leaf>, options: TreeOptions) -> Result<MerkleTree> {
        let layer: Vec<Hash> = leaves.iter().map(Leaf::hash).collect();
        let layers = Self::build(layer, &options)?;
        Ok(MerkleTree {
            layers,
            leaves,
            options,
        })
    }

    /// Creates new merkle tree from a list of string values, encoding each
    /// with `encoder` and hashing with the digest in `options`.
    pub fn from_data<S, I>(values: I, encoder: &LeafEncoder, options: TreeOptions) -> Result<MerkleTree>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut a = options.hasher();
        let leaves = values
            .into_iter()
            .map(|v| encoder.leaf(&mut a, v.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_leaves(leaves, options)
    }

    fn build(leaves: Vec<Hash>, options: &TreeOptions) -> Result<Vec<Vec<Hash>>> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        debug!(
            "building merkle tree over {} leaves (sort_pairs: {}, hash: {}, odd nodes: {})",
            leaves.len(),
            options.sort_pairs,
            options.hash_algorithm,
            options.odd_node_policy
        );

        let mut a = options.hasher();
        let mut layers = vec![leaves];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() == 1 {
                break;
            }
            let next = next_layer(&mut a, current, options);
            trace!("layer {}: {} -> {} nodes", layers.len(), current.len(), next.len());
            debug_assert_eq!(next.len(), (current.len() + 1) / 2);
            layers.push(next);
        }

        debug!("merkle tree built with depth {}", layers.len() - 1);
        Ok(layers)
    }

    /// Generate merkle tree inclusion proof for the leaf with hash `leaf`.
    ///
    /// When the same hash occurs more than once the first occurrence is
    /// proven.
    pub fn gen_proof(&self, leaf: &Hash) -> Result<Proof> {
        let index = self
            .leaf_index(leaf)
            .ok_or(MerkleError::LeafNotFound(*leaf))?;
        self.gen_proof_at(index)
    }

    /// Generate merkle tree inclusion proof for leaf `i`.
    pub fn gen_proof_at(&self, i: usize) -> Result<Proof> {
        let leaves = self.leaf_count();
        if i >= leaves {
            return Err(MerkleError::IndexOutOfRange { index: i, leaves });
        }

        let proof = self.proof_path(i);
        debug!("generated proof for leaf {} with {} elements", i, proof.len());
        Ok(proof)
    }

    /// Proofs of every leaf, in leaf order.
    pub fn proofs(&self) -> Vec<Proof> {
        (0..self.leaf_count())
            .into_par_iter()
            .map(|i| self.proof_path(i))
            .collect()
    }

    // i in [0 .. self.leaf_count())
    fn proof_path(&self, i: usize) -> Proof {
        let mut elements = Vec::with_capacity(self.depth());
        let mut j = i;
        for layer in &self.layers[..self.depth()] {
            let sibling = j ^ 1;
            if sibling < layer.len() {
                let position = if sibling < j {
                    Position::Left
                } else {
                    Position::Right
                };
                elements.push(ProofElement::new(layer[sibling], position));
            } else if self.options.odd_node_policy == OddNodePolicy::DuplicateLast {
                // unpaired node was hashed with a copy of itself
                elements.push(ProofElement::new(layer[j], Position::Right));
            }
            j >>= 1;
        }
        Proof::new(elements)
    }

    /// Verifies `proof` for `leaf` against this tree's root and options.
    pub fn verify(&self, leaf: &Hash, proof: &Proof) -> bool {
        let mut a = self.options.hasher();
        proof.validate(&mut a, leaf, &self.root(), self.options.sort_pairs)
    }

    /// Returns merkle root
    pub fn root(&self) -> Hash {
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of derivation steps from the leaves to the root.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Number of leaves the tree was built upon.
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Layer 0.
    pub fn leaf_hashes(&self) -> &[Hash] {
        &self.layers[0]
    }

    /// Leaf records, empty when the tree was built from bare hashes.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Position of the first leaf equal to `leaf`.
    pub fn leaf_index(&self, leaf: &Hash) -> Option<usize> {
        self.layers[0].iter().position(|h| h == leaf)
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Layer `i`, if the tree has it.
    pub fn layer(&self, i: usize) -> Option<&[Hash]> {
        self.layers.get(i).map(Vec::as_slice)
    }

    /// The node at (`layer`, `position`), if any.
    pub fn node(&self, layer: usize, position: usize) -> Option<Node> {
        let hash = *self.layers.get(layer)?.get(position)?;
        Some(Node {
            layer,
            position,
            hash,
        })
    }

    /// Every node, layer by layer starting from the leaves.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.layers.iter().enumerate().flat_map(|(layer, hashes)| {
            hashes.iter().enumerate().map(move |(position, &hash)| Node {
                layer,
                position,
                hash,
            })
        })
    }

    /// Options the tree was built with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Whether pairs were hashed in sorted order.
    pub fn sort_pairs(&self) -> bool {
        self.options.sort_pairs
    }
}

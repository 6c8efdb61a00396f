use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hash::{HashAlgorithm, HashPrimitive};

/// What happens to the last node of a layer with an odd number of nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OddNodePolicy {
    /// The unpaired node is promoted to the next layer unchanged.
    #[default]
    CarryForward,
    /// The unpaired node is hashed with a copy of itself.
    DuplicateLast,
}

impl OddNodePolicy {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            OddNodePolicy::CarryForward => "carry-forward",
            OddNodePolicy::DuplicateLast => "duplicate-last",
        }
    }
}

impl fmt::Display for OddNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OddNodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "carry-forward" | "carry" => Ok(OddNodePolicy::CarryForward),
            "duplicate-last" | "duplicate" => Ok(OddNodePolicy::DuplicateLast),
            other => Err(format!("unknown odd node policy `{}`", other)),
        }
    }
}

/// Construction rules recorded by every tree.
///
/// Proofs only verify against a root when the verifier pairs hashes the
/// same way the tree did, so these options travel with the tree and should
/// be published next to the root.
///
/// Deserializes from the camel-case keys `sortPairs`, `hashAlgorithm` and
/// `oddNodePolicy`; missing keys take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeOptions {
    /// Concatenate each pair in ascending byte order before hashing.
    pub sort_pairs: bool,

    /// Digest applied to leaves and pairs.
    pub hash_algorithm: HashAlgorithm,

    /// Treatment of an unpaired trailing node.
    pub odd_node_policy: OddNodePolicy,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            sort_pairs: true,
            hash_algorithm: HashAlgorithm::Keccak256,
            odd_node_policy: OddNodePolicy::CarryForward,
        }
    }
}

impl TreeOptions {
    /// Creates options with every field given explicitly.
    pub fn new(
        sort_pairs: bool,
        hash_algorithm: HashAlgorithm,
        odd_node_policy: OddNodePolicy,
    ) -> Self {
        TreeOptions {
            sort_pairs,
            hash_algorithm,
            odd_node_policy,
        }
    }

    /// Sets the pair ordering rule.
    pub fn with_sort_pairs(mut self, sort_pairs: bool) -> Self {
        self.sort_pairs = sort_pairs;
        self
    }

    /// Sets the digest.
    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// Sets the odd node policy.
    pub fn with_odd_node_policy(mut self, odd_node_policy: OddNodePolicy) -> Self {
        self.odd_node_policy = odd_node_policy;
        self
    }

    /// Fresh hash state for the configured digest.
    pub fn hasher(&self) -> HashPrimitive {
        HashPrimitive::new(self.hash_algorithm)
    }
}

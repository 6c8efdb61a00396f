use merkle_generator::hash::{Algorithm, Sha256Algorithm};
use merkle_generator::{
    HashAlgorithm, LeafEncoder, MerkleTree, OddNodePolicy, Position, TreeOptions,
};

fn letters(n: usize) -> Vec<String> {
    ["a", "b", "c", "d", "e", "f"][..n]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn positional() -> TreeOptions {
    TreeOptions::default()
        .with_hash_algorithm(HashAlgorithm::Sha256)
        .with_sort_pairs(false)
}

#[test]
fn test_sha256_positional_carry_forward() {
    let t = MerkleTree::from_data(letters(6), &LeafEncoder::default(), positional()).unwrap();
    assert_eq!(
        t.hex_root(),
        "0x1f7379539707bcaea00564168d1d4d626b09b73f8a2a365234c62d763f854da2"
    );
    assert_eq!(t.depth(), 3);

    let mut a = Sha256Algorithm::new();
    let leaves = t.leaf_hashes().to_vec();
    assert_eq!(leaves[0], a.digest(b"a"));

    // "e" and "f" are paired first, then carried up one layer
    let ef = a.node(&leaves[4], &leaves[5]);
    assert_eq!(t.layer(2).unwrap()[1], ef);

    let proof = t.gen_proof_at(4).unwrap();
    assert_eq!(proof.len(), 2);
    assert_eq!(proof.elements()[0].position, Position::Right);
    assert_eq!(proof.elements()[1].position, Position::Left);
    assert!(t.verify(&leaves[4], &proof));
}

#[test]
fn test_sha256_sorted() {
    let options = TreeOptions::default().with_hash_algorithm(HashAlgorithm::Sha256);
    let t = MerkleTree::from_data(letters(6), &LeafEncoder::default(), options).unwrap();
    assert_eq!(
        t.hex_root(),
        "0xa30ba95a1a5dc397fe45ea20105363b08d682b864a28f4940419a29349a28325"
    );
    for (i, proof) in t.proofs().iter().enumerate() {
        assert!(t.verify(&t.leaf_hashes()[i], proof));
    }
}

#[test]
fn test_sha256_duplicate_last() {
    let options = positional().with_odd_node_policy(OddNodePolicy::DuplicateLast);
    let t = MerkleTree::from_data(letters(5), &LeafEncoder::default(), options).unwrap();
    assert_eq!(
        t.hex_root(),
        "0xdd14d0ba516bb654a3052b76f051db026f4e322d0be081468fab99440f9e7305"
    );
    let widths: Vec<usize> = t.layers().iter().map(Vec::len).collect();
    assert_eq!(widths, vec![5, 3, 2, 1]);

    let e = t.leaf_hashes()[4];
    let proof = t.gen_proof(&e).unwrap();
    assert_eq!(proof.len(), 3);
    assert_eq!(proof.elements()[0].sibling, e);
    assert!(t.verify(&e, &proof));

    // the same leaves under carry-forward commit to a different root
    let c = MerkleTree::from_data(letters(5), &LeafEncoder::default(), positional()).unwrap();
    assert_ne!(c.root(), t.root());
}

#[test]
fn test_sha256_positions_matter_without_sorting() {
    let t = MerkleTree::from_data(letters(4), &LeafEncoder::default(), positional()).unwrap();
    let leaf = t.leaf_hashes()[1];
    let proof = t.gen_proof(&leaf).unwrap();
    assert!(t.verify(&leaf, &proof));

    let mut swapped = proof.elements().to_vec();
    swapped[0].position = match swapped[0].position {
        Position::Left => Position::Right,
        Position::Right => Position::Left,
    };
    assert!(!t.verify(&leaf, &swapped.into()));
}

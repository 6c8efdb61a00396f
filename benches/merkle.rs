use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use merkle_generator::hash::Algorithm;
use merkle_generator::{
    verify, Hash, HashAlgorithm, LeafEncoder, MerkleTree, OddNodePolicy, TreeOptions,
};

fn make_leaves(count: usize, alg: HashAlgorithm) -> Vec<Hash> {
    let mut a = TreeOptions::default().with_hash_algorithm(alg).hasher();
    (0..count)
        .map(|i| a.digest(&(i as u64).to_le_bytes()))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let sizes = [1_000usize, 16_384, 100_000];
    for alg in [HashAlgorithm::Keccak256, HashAlgorithm::Sha256] {
        let options = TreeOptions::default().with_hash_algorithm(alg);
        let mut group = c.benchmark_group(format!("build_{}", alg));
        for &size in &sizes {
            let leaves = make_leaves(size, alg);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), &leaves, |b, leaves| {
                b.iter(|| MerkleTree::new(leaves.iter().copied(), options).unwrap())
            });
        }
        group.finish();
    }
}

fn bench_from_data(c: &mut Criterion) {
    let values: Vec<String> = (0..10_000)
        .map(|i| format!("0x{:040x}", i as u128 * 0x9e37_79b9_7f4a_7c15))
        .collect();
    let encoder = LeafEncoder::default();
    c.bench_function("from_data_10k_addresses", |b| {
        b.iter(|| MerkleTree::from_data(&values, &encoder, TreeOptions::default()).unwrap())
    });
}

fn bench_proofs(c: &mut Criterion) {
    let leaves = make_leaves(65_536, HashAlgorithm::Keccak256);
    for policy in [OddNodePolicy::CarryForward, OddNodePolicy::DuplicateLast] {
        let options = TreeOptions::default().with_odd_node_policy(policy);
        // one short of a power of two so the last leaf is unpaired
        let tree = MerkleTree::new(leaves[..leaves.len() - 1].iter().copied(), options).unwrap();
        let mut group = c.benchmark_group(format!("proof_{}", policy));
        group.bench_function("gen_proof", |b| {
            let leaf = leaves[leaves.len() - 2];
            b.iter(|| tree.gen_proof(black_box(&leaf)).unwrap())
        });
        group.bench_function("gen_proof_at", |b| {
            b.iter(|| tree.gen_proof_at(black_box(4_321)).unwrap())
        });
        group.bench_function("proofs", |b| b.iter(|| tree.proofs()));
        group.finish();
    }
}

fn bench_verify(c: &mut Criterion) {
    let leaves = make_leaves(65_536, HashAlgorithm::Keccak256);
    let tree = MerkleTree::new(leaves.iter().copied(), TreeOptions::default()).unwrap();
    let root = tree.root();
    let proof = tree.gen_proof_at(1_234).unwrap();
    let mut a = TreeOptions::default().hasher();
    c.bench_function("verify_keccak256_65536", |b| {
        b.iter(|| {
            assert!(verify(
                &mut a,
                black_box(&leaves[1_234]),
                &proof,
                &root,
                true
            ))
        })
    });
}

criterion_group!(benches, bench_build, bench_from_data, bench_proofs, bench_verify);
criterion_main!(benches);

use crate::hash::{Algorithm, Hash, Keccak256Algorithm};

/// Keccak-256 of the decimal rendering of `i * 93`, for `i` in `0..n`.
pub fn leaf_hashes(n: usize) -> Vec<Hash> {
    let mut a = Keccak256Algorithm::new();
    (0..n).map(|i| a.digest((i * 93).to_string().as_bytes())).collect()
}

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn prime_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

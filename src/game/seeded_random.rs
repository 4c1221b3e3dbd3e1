const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic map from a string seed to `[0, 1)`.
///
/// Uses only integer hashing and one exact conversion (53 bits into an f64), so the
/// output is identical on every platform.
pub fn seeded_random(seed: &str) -> f64 {
    let bits = splitmix64(fnv1a(seed.as_bytes())) >> 11;
    bits as f64 / (1u64 << 53) as f64
}

/// Index in `0..len` drawn from `seed`. `len` must be non-zero.
pub fn seeded_index(seed: &str, len: usize) -> usize {
    let index = (seeded_random(seed) * len as f64).floor() as usize;
    index.min(len.saturating_sub(1))
}

/// Fisher-Yates shuffle driven by `seeded_random`, one sub-seed per swap.
pub fn seeded_shuffle<T>(items: &mut [T], seed: &str) {
    for i in (1..items.len()).rev() {
        let j = seeded_index(&format!("{seed}-shuffle-{i}"), i + 1);
        items.swap(i, j);
    }
}

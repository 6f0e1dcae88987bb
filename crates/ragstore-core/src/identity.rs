//! Deterministic identity derivation for chunks and indexes.

use twox_hash::xxh3;

const SIGNED_64_RANGE: u128 = 1 << 63;

/// Derives a stable, non-negative 63-bit identifier for a chunk.
///
/// The id is a pure function of `(filename, index, content)` where `index`
/// is the chunk's position in the overall ingestion sequence. Identical
/// inputs always map to the same id, which makes re-ingestion overwrite
/// instead of duplicate. Empty `filename` or `content` are fine.
pub fn chunk_id(filename: &str, content: &str, index: usize) -> i64 {
    let base = format!("{}-{}-{}", filename, index, content);
    let digest = xxh3::hash128(base.as_bytes());
    // High 64 bits, reduced into the signed 64-bit range.
    ((digest >> 64) % SIGNED_64_RANGE) as i64
}

/// Hex digest used to turn a logical index name into its physical name.
pub fn index_digest(name: &str) -> String {
    format!("{:032x}", xxh3::hash128(name.as_bytes()))
}

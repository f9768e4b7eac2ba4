const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Computes the 32-bit FNV-1a hash of `bytes`.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV32_PRIME);
    }
    hash
}

/// Maps a qualified table name onto an index into a sorted replica list of `replica_count`.
///
/// Every replica evaluating this with the same inputs lands on the same index.
pub fn stable_replica_index(full_name: &str, replica_count: usize) -> usize {
    if replica_count == 0 {
        return 0;
    }
    (fnv1a_32(full_name.as_bytes()) as u64 % replica_count as u64) as usize
}

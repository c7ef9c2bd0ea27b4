//! Content hashing for change detection.

/// Hash arbitrary bytes to a u64 (first 8 bytes of blake3).
///
/// Used to skip config reloads when the file content is unchanged.
pub fn compute(bytes: &[u8]) -> u64 {
    let hash = blake3::hash(bytes);
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_and_distinct() {
        assert_eq!(compute(b"abc"), compute(b"abc"));
        assert_ne!(compute(b"abc"), compute(b"abd"));
    }
}

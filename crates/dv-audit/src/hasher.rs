// hasher.rs — SHA-256 hashing for the audit chain.
//
// Hashes are hex-encoded lowercase. The chain hashes raw JSON lines, not
// re-serialized structs, so field order never breaks verification.

use sha2::{Digest, Sha256};

/// Hash arbitrary bytes, returning a lowercase hex-encoded SHA-256 string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Hash a UTF-8 string, returning a lowercase hex-encoded SHA-256 string.
pub fn hash_str(s: &str) -> String {
    hash_bytes(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_str("hello"), hash_str("hello"));
        assert_ne!(hash_str("hello"), hash_str("world"));
    }

    #[test]
    fn output_is_64_hex_chars() {
        let h = hash_bytes(b"anything");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a query.
///
/// The raw query bytes are hashed as-is: no trimming, no case folding.
pub fn compute_cache_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("cats");
        let hash2 = compute_cache_key("cats");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_distinct_queries() {
        assert_ne!(compute_cache_key("cats"), compute_cache_key("dogs"));
    }

    #[test]
    fn test_hash_no_normalization() {
        assert_ne!(compute_cache_key("cats"), compute_cache_key("Cats"));
        assert_ne!(compute_cache_key("cats"), compute_cache_key(" cats"));
        assert_ne!(compute_cache_key("cats"), compute_cache_key("cats "));
    }

    #[test]
    fn test_hash_known_vector() {
        assert_eq!(
            compute_cache_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("red panda");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

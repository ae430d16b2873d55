//! Content digests used to gate re-summarization.

use sha2::{Digest, Sha256};

/// SHA-256 of `text`, lowercase hex.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(content_hash("def foo(): pass"), content_hash("def foo(): pass"));
        assert_eq!(content_hash("").len(), 64);
    }

    #[test]
    fn test_hash_tracks_whitespace() {
        assert_ne!(content_hash("def foo(): pass"), content_hash("def foo():  pass"));
    }
}

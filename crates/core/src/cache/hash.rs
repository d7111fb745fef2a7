//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 key for an identifier, hex-encoded (64 chars).
pub fn hash_key(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}

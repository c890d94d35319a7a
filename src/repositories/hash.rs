use sha2::{Digest, Sha256};

/// Uniqueness key for a posting: hex SHA-256 of the lower-cased description.
///
/// Only case is normalized. Whitespace or punctuation changes produce a new
/// key, so a reworded repost is stored again.
pub fn content_hash(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}

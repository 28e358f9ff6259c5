//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Deterministic cache key for a feature and its parameters.
///
/// Parameters are sorted first, so the same filters given in a different
/// order hit the same entry.
pub fn cache_key<K, V>(feature: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut hasher = Sha256::new();

    hasher.update(feature.as_bytes());
    hasher.update(b"|");

    let mut sorted: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    sorted.sort();

    for (k, v) in sorted {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}

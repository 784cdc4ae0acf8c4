//! Request-identity hashing for cache entry keys.

use sha2::{Digest, Sha256};

/// Compute the entry key for a request identity (method + absolute URL).
///
/// The method is uppercased so `get` and `GET` address the same entry; the
/// URL is taken verbatim, query string included.
pub fn compute_entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

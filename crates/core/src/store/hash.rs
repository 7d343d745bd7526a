//! Canonical search query and its cache key.
//!
//! Parameters are sorted by name and form-encoded, then hashed with SHA-256.
//! The same parameter set always yields the same key, whatever order the
//! parameters were collected in.

use sha2::{Digest, Sha256};

/// A canonicalized query string together with its SHA-256 cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    /// Sorted `key=value&...` form.
    pub text: String,
    /// Lowercase hex SHA-256 of `text`.
    pub hash: String,
}

/// Canonicalize a parameter set into its cache key.
///
/// Names are sorted lexicographically; parameters sharing a name keep their
/// relative order.
pub fn canonicalize<I, K, V>(params: I) -> CanonicalQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = params.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let text = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(entries.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish();
    let hash = compute_query_hash(&text);

    CanonicalQuery { text, hash }
}

/// SHA-256 of a canonical query string, hex encoded.
pub fn compute_query_hash(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

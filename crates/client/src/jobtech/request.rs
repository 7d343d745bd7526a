//! Search request building.
//!
//! `SearchFilters` holds what the caller asked for; `SearchParams` is the
//! exact parameter set sent upstream and hashed into the cache key.

use jobswipe_core::store::{CanonicalQuery, canonicalize};
use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size forwarded upstream.
pub const MAX_LIMIT: u32 = 100;

/// Default result detail level.
pub const DEFAULT_RESDET: &str = "full";

/// Raw search filters as received from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    /// Occupation-field concept id.
    pub category_id: Option<String>,
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub country: Option<String>,
    pub remote: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Result detail level, `full` unless set.
    pub resdet: Option<String>,
}

/// Clamp a requested page size into `1..=MAX_LIMIT`.
///
/// Missing, zero and negative values fall back to [`DEFAULT_LIMIT`].
pub fn clamp_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(n) if n > 0 => u32::try_from(n.min(i64::from(MAX_LIMIT))).unwrap_or(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

/// Clamp a requested offset to zero or more.
pub fn clamp_offset(offset: Option<i64>) -> u64 {
    offset.map_or(0, |n| u64::try_from(n).unwrap_or(0))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SearchFilters {
    /// Effective page size after clamping.
    pub fn effective_limit(&self) -> u32 {
        clamp_limit(self.limit)
    }

    /// Effective offset after clamping.
    pub fn effective_offset(&self) -> u64 {
        clamp_offset(self.offset)
    }

    /// Build the upstream parameter set.
    ///
    /// Keywords, location and category are joined into the free-text `q`.
    /// Empty filters are dropped so they never reach the cache key; `offset`
    /// is only sent when positive.
    pub fn to_params(&self) -> SearchParams {
        let mut pairs: Vec<(String, String)> = Vec::new();

        let text: Vec<&str> = [&self.keywords, &self.location, &self.category]
            .into_iter()
            .filter_map(non_empty)
            .collect();
        if !text.is_empty() {
            pairs.push(("q".into(), text.join(" ")));
        }

        let passthrough = [
            ("occupation-field", &self.category_id),
            ("region", &self.region),
            ("municipality", &self.municipality),
            ("country", &self.country),
            ("remote", &self.remote),
        ];
        for (name, value) in passthrough {
            if let Some(value) = non_empty(value) {
                pairs.push((name.into(), value.into()));
            }
        }

        pairs.push(("limit".into(), self.effective_limit().to_string()));

        let offset = self.effective_offset();
        if offset > 0 {
            pairs.push(("offset".into(), offset.to_string()));
        }

        let resdet = non_empty(&self.resdet).unwrap_or(DEFAULT_RESDET);
        pairs.push(("resdet".into(), resdet.into()));

        SearchParams { pairs }
    }
}

/// Parameter set for `GET /search`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Canonical form and cache key of this parameter set.
    pub fn canonical(&self) -> CanonicalQuery {
        canonicalize(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

//! JobSearch API response types.

use jobswipe_core::JobAd;
use serde::Deserialize;

/// Raw response from `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: Option<Total>,
    #[serde(default)]
    pub hits: Vec<JobAd>,
}

/// Total match count across all pages.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Total {
    pub value: u64,
}

impl SearchResponse {
    /// Upstream total, or the page size when upstream omits it.
    pub fn total_or_hits(&self) -> u64 {
        self.total.map_or(self.hits.len() as u64, |t| t.value)
    }

    /// Ids of the hits in rank order.
    pub fn job_ids(&self) -> Vec<String> {
        self.hits.iter().map(|job| job.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "total": {"value": 1234},
        "positions": 2,
        "query_time_in_millis": 12,
        "hits": [
            {
                "id": "29384756",
                "headline": "Rust developer",
                "employer": {"name": "Acme AB"},
                "workplace_address": {"municipality": "Stockholm", "coordinates": [18.06, 59.33]}
            },
            {"id": "29384757", "headline": null}
        ]
    }"#;

    #[test]
    fn test_deserialize_search_response() {
        let response: SearchResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.total_or_hits(), 1234);
        assert_eq!(response.job_ids(), vec!["29384756", "29384757"]);
        assert_eq!(response.hits[0].employer_name(), Some("Acme AB"));
        assert!(response.hits[1].headline.is_none());
    }

    #[test]
    fn test_missing_total_falls_back_to_hit_count() {
        let response: SearchResponse = serde_json::from_str(r#"{"hits": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(response.total_or_hits(), 2);
    }

    #[test]
    fn test_empty_response() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.hits.is_empty());
        assert_eq!(response.total_or_hits(), 0);
    }
}

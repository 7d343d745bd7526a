//! Job search with a cache-aside search cache.
//!
//! A fresh cache entry whose jobs are all still stored is served without
//! calling upstream. Anything else (no entry, stale entry, missing jobs)
//! goes to the JobSearch API and rewrites the jobs and the entry in one
//! transaction.

use axum::{
    Json,
    extract::{Query, State},
};
use jobswipe_client::SearchFilters;
use jobswipe_core::store::now_ms;
use jobswipe_core::{Error, JobAd, JobCard, JobStore, SearchCacheEntry};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handler::AppState;

/// Upstream name reported in search responses.
pub const SOURCE: &str = "jobtech";

/// Query string accepted by `GET /api/jobs`.
///
/// `q` and `keywords` are synonyms (`q` wins), as are `categoryId` and
/// `occupationField`. Numbers are parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub occupation_field: Option<String>,
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub country: Option<String>,
    pub remote: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub resdet: Option<String>,
}

/// Parse the leading integer of `value`, ignoring trailing garbage.
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let digits_start = usize::from(value.starts_with(['-', '+']));
    let digits_len = value[digits_start..].bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let number = &value[..digits_start + digits_len];
    number.parse().ok().or_else(|| Some(if number.starts_with('-') { i64::MIN } else { i64::MAX }))
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<SearchQuery> for SearchFilters {
    fn from(query: SearchQuery) -> Self {
        SearchFilters {
            keywords: present(query.q).or(present(query.keywords)),
            location: present(query.location),
            category: present(query.category),
            category_id: present(query.category_id).or(present(query.occupation_field)),
            region: present(query.region),
            municipality: present(query.municipality),
            country: present(query.country),
            remote: present(query.remote),
            limit: query.limit.as_deref().and_then(parse_leading_int),
            offset: query.offset.as_deref().and_then(parse_leading_int),
            resdet: present(query.resdet),
        }
    }
}

/// The query as interpreted, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEcho {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub country: Option<String>,
    pub remote: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

impl From<&SearchFilters> for QueryEcho {
    fn from(filters: &SearchFilters) -> Self {
        QueryEcho {
            keywords: filters.keywords.clone(),
            location: filters.location.clone(),
            category: filters.category.clone(),
            category_id: filters.category_id.clone(),
            region: filters.region.clone(),
            municipality: filters.municipality.clone(),
            country: filters.country.clone(),
            remote: filters.remote.clone(),
            limit: filters.effective_limit(),
            offset: filters.effective_offset(),
        }
    }
}

/// Response body of `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutput {
    pub source: String,
    pub cached: bool,
    pub total: u64,
    pub count: usize,
    pub jobs: Vec<JobCard>,
    pub query: QueryEcho,
}

impl SearchOutput {
    fn new(cached: bool, total: u64, jobs: Vec<JobCard>, filters: &SearchFilters) -> Self {
        Self { source: SOURCE.to_string(), cached, total, count: jobs.len(), jobs, query: filters.into() }
    }
}

/// Project jobs into cards carrying their stored swipe direction.
async fn to_cards(store: &JobStore, jobs: &[JobAd]) -> Result<Vec<JobCard>, Error> {
    let ids: Vec<String> = jobs.iter().map(|job| job.id.clone()).collect();
    let swipes = store.get_swipe_map(&ids).await?;
    Ok(jobs.iter().map(|job| job.to_card(swipes.get(&job.id).copied())).collect())
}

/// Search jobs, serving from the cache when possible.
pub async fn search_impl(state: &AppState, filters: SearchFilters) -> Result<SearchOutput, Error> {
    search_at(state, filters, now_ms()).await
}

/// [`search_impl`] with an explicit clock, in epoch milliseconds.
pub async fn search_at(state: &AppState, filters: SearchFilters, now: i64) -> Result<SearchOutput, Error> {
    let params = filters.to_params();
    let canonical = params.canonical();

    if let Some(entry) = state.store.get_fresh_search(&canonical.hash, state.cache_ttl, now).await? {
        let jobs = state.store.get_jobs_by_ids(&entry.job_ids).await?;
        if jobs.len() == entry.job_ids.len() {
            tracing::debug!(hash = %canonical.hash, count = jobs.len(), "search cache hit");
            let cards = to_cards(&state.store, &jobs).await?;
            return Ok(SearchOutput::new(true, entry.total, cards, &filters));
        }
        tracing::debug!(
            hash = %canonical.hash,
            expected = entry.job_ids.len(),
            found = jobs.len(),
            "cached search references missing jobs, refetching"
        );
    } else {
        tracing::debug!(hash = %canonical.hash, query = %canonical.text, "search cache miss");
    }

    let response = state.source.search(&params).await?;

    let entry = SearchCacheEntry {
        query_hash: canonical.hash,
        query: canonical.text,
        job_ids: response.job_ids(),
        total: response.total_or_hits(),
        fetched_at: now,
    };
    state.store.save_search_results(&response.hits, &entry).await?;

    let cards = to_cards(&state.store, &response.hits).await?;
    Ok(SearchOutput::new(false, entry.total, cards, &filters))
}

/// `GET /api/jobs`
pub async fn search(
    State(state): State<AppState>, Query(query): Query<SearchQuery>,
) -> Result<Json<SearchOutput>, ApiError> {
    Ok(Json(search_impl(&state, query.into()).await?))
}

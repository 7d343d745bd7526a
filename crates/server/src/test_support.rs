//! Scripted job source and state helpers shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jobswipe_client::jobtech::response::Total;
use jobswipe_client::{JobSource, JobtechError, SearchParams, SearchResponse};
use jobswipe_core::job::{Description, Employer};
use jobswipe_core::{JobAd, JobStore};

use crate::handler::AppState;

/// In-process [`JobSource`] that answers from canned data and counts calls.
#[derive(Default)]
pub struct FakeSource {
    hits: Vec<JobAd>,
    total: Option<u64>,
    ads: HashMap<String, JobAd>,
    failure: Mutex<Option<JobtechError>>,
    searches: Mutex<Vec<SearchParams>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_hits(hits: Vec<JobAd>, total: Option<u64>) -> Self {
        Self { hits, total, ..Default::default() }
    }

    pub fn failing(err: JobtechError) -> Self {
        let source = Self::default();
        source.fail_with(err);
        source
    }

    /// Make `fetch_ad` return `ad` for its id.
    pub fn with_ad(self, ad: JobAd) -> Self {
        let id = ad.id.clone();
        self.with_ad_at(&id, ad)
    }

    /// Make `fetch_ad(key)` return `ad`, whatever id the ad carries.
    pub fn with_ad_at(mut self, key: &str, ad: JobAd) -> Self {
        self.ads.insert(key.to_string(), ad);
        self
    }

    /// Fail every later call with `err`.
    pub fn fail_with(&self, err: JobtechError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<SearchParams> {
        self.searches.lock().unwrap().last().cloned()
    }

    fn check_failure(&self) -> Result<(), JobtechError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobSource for FakeSource {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, JobtechError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().unwrap().push(params.clone());
        self.check_failure()?;
        Ok(SearchResponse { total: self.total.map(|value| Total { value }), hits: self.hits.clone() })
    }

    async fn fetch_ad(&self, id: &str) -> Result<JobAd, JobtechError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.ads.get(id).cloned().ok_or_else(|| JobtechError::NotFound(id.to_string()))
    }
}

/// A small but fully populated ad.
pub fn ad(id: &str) -> JobAd {
    JobAd {
        headline: Some(format!("Job {id}")),
        employer: Some(Employer { name: Some("Acme AB".into()), ..Default::default() }),
        description: Some(Description { text: Some(format!("Description of job {id}.")), ..Default::default() }),
        ..JobAd::new(id)
    }
}

/// State over a fresh in-memory store.
pub async fn state_with(source: Arc<FakeSource>, cache_ttl: Duration) -> AppState {
    let store = JobStore::open_in_memory().await.unwrap();
    AppState::new(store, source, cache_ttl)
}

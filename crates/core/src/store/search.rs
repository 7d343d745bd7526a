//! Search cache operations.
//!
//! An entry maps a canonical query hash to the ordered job ids upstream
//! returned for it. Entries carry no ttl of their own: freshness is judged
//! at read time against the ttl the caller passes in.

use std::time::Duration;

use super::connection::JobStore;
use super::jobs::upsert_jobs;
use crate::{Error, JobAd};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCacheEntry {
    pub query_hash: String,
    /// Canonical query text the hash was computed from.
    pub query: String,
    /// Job ids in upstream rank order.
    pub job_ids: Vec<String>,
    /// Total matches reported upstream, not just this page.
    pub total: u64,
    pub fetched_at: i64,
}

impl SearchCacheEntry {
    /// Whether the entry is still fresh at `now` for the given ttl.
    ///
    /// The boundary is inclusive: an entry exactly `ttl` old is fresh.
    pub fn is_fresh(&self, ttl: Duration, now: i64) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(self.fetched_at) <= ttl_ms
    }
}

fn put_entry(conn: &rusqlite::Connection, entry: &SearchCacheEntry) -> Result<(), Error> {
    let job_ids = serde_json::to_string(&entry.job_ids)?;
    let total = i64::try_from(entry.total).unwrap_or(i64::MAX);
    conn.execute(
        "INSERT INTO search_cache (query_hash, query, job_ids, total, fetched_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(query_hash) DO UPDATE SET
            query = excluded.query,
            job_ids = excluded.job_ids,
            total = excluded.total,
            fetched_at = excluded.fetched_at",
        params![entry.query_hash, entry.query, job_ids, total, entry.fetched_at],
    )?;
    Ok(())
}

impl JobStore {
    /// Get a cached search entry by hash, fresh or not.
    pub async fn get_search(&self, query_hash: &str) -> Result<Option<SearchCacheEntry>, Error> {
        let query_hash = query_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<SearchCacheEntry>, Error> {
                let result = conn.query_row(
                    "SELECT query, job_ids, total, fetched_at FROM search_cache WHERE query_hash = ?1",
                    params![query_hash],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    },
                );

                match result {
                    Ok((query, job_ids, total, fetched_at)) => Ok(Some(SearchCacheEntry {
                        query_hash,
                        query,
                        job_ids: serde_json::from_str(&job_ids)?,
                        total: u64::try_from(total).unwrap_or_default(),
                        fetched_at,
                    })),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get a cached search entry only if it is fresh at `now` for `ttl`.
    pub async fn get_fresh_search(
        &self, query_hash: &str, ttl: Duration, now: i64,
    ) -> Result<Option<SearchCacheEntry>, Error> {
        Ok(self.get_search(query_hash).await?.filter(|entry| entry.is_fresh(ttl, now)))
    }

    /// Insert or update a cached search entry.
    pub async fn put_search(&self, entry: &SearchCacheEntry) -> Result<(), Error> {
        let entry = entry.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> { put_entry(conn, &entry) })
            .await
            .map_err(Error::from)
    }

    /// Persist a fresh upstream result: every job plus the cache entry.
    ///
    /// Runs as one transaction, so a failure leaves the store untouched.
    pub async fn save_search_results(&self, jobs: &[JobAd], entry: &SearchCacheEntry) -> Result<(), Error> {
        let jobs = jobs.to_vec();
        let entry = entry.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                upsert_jobs(&tx, &jobs, entry.fetched_at)?;
                put_entry(&tx, &entry)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached search entries.
    pub async fn count_searches(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

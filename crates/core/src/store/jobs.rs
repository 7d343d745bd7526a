//! Job record operations.
//!
//! Jobs are upserted by id whenever they are fetched and never deleted.
//! The full upstream payload lives in `data_json`; the other columns are
//! denormalized copies for inspection with plain SQL.

use std::collections::HashMap;

use super::connection::JobStore;
use crate::{Error, JobAd};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, params_from_iter};

const UPSERT_JOB_SQL: &str = "INSERT INTO jobs (
        id, headline, employer_name, location, logo_url, webpage_url,
        published_at, data_json, fetched_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(id) DO UPDATE SET
        headline = excluded.headline,
        employer_name = excluded.employer_name,
        location = excluded.location,
        logo_url = excluded.logo_url,
        webpage_url = excluded.webpage_url,
        published_at = excluded.published_at,
        data_json = excluded.data_json,
        fetched_at = excluded.fetched_at";

/// Upsert a batch of jobs on an open transaction or connection.
pub(crate) fn upsert_jobs(conn: &rusqlite::Connection, jobs: &[JobAd], fetched_at: i64) -> Result<(), Error> {
    let mut stmt = conn.prepare_cached(UPSERT_JOB_SQL)?;
    for job in jobs {
        let data_json = serde_json::to_string(job)?;
        stmt.execute(params![
            job.id,
            job.headline,
            job.employer_name(),
            job.location_label(),
            job.logo_url,
            job.webpage_url,
            job.publication_date,
            data_json,
            fetched_at,
        ])?;
    }
    Ok(())
}

/// Placeholder list `?, ?, ?` for an IN clause.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl JobStore {
    /// Insert or update jobs in one transaction.
    ///
    /// Either every job is written or, on failure, none is.
    pub async fn save_jobs(&self, jobs: &[JobAd], fetched_at: i64) -> Result<(), Error> {
        let jobs = jobs.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                upsert_jobs(&tx, &jobs, fetched_at)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a stored job by id.
    pub async fn get_job(&self, id: &str) -> Result<Option<JobAd>, Error> {
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<JobAd>, Error> {
                let result = conn.query_row("SELECT data_json FROM jobs WHERE id = ?1", params![id], |row| {
                    row.get::<_, String>(0)
                });

                match result {
                    Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get stored jobs for the given ids, in the order of `ids`.
    ///
    /// Ids with no stored job are skipped, so the result can be shorter than `ids`.
    pub async fn get_jobs_by_ids(&self, ids: &[String]) -> Result<Vec<JobAd>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids.to_vec();
        self.conn
            .call(move |conn| -> Result<Vec<JobAd>, Error> {
                let sql = format!("SELECT id, data_json FROM jobs WHERE id IN ({})", placeholders(ids.len()));
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut by_id = HashMap::new();
                for row in rows {
                    let (id, json) = row?;
                    by_id.insert(id, json);
                }

                ids.iter()
                    .filter_map(|id| by_id.get(id))
                    .map(|json| serde_json::from_str(json).map_err(Error::from))
                    .collect()
            })
            .await
            .map_err(Error::from)
    }

    /// When a stored job was last fetched from upstream, in epoch milliseconds.
    pub async fn job_fetched_at(&self, id: &str) -> Result<Option<i64>, Error> {
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<i64>, Error> {
                match conn.query_row("SELECT fetched_at FROM jobs WHERE id = ?1", params![id], |row| row.get(0)) {
                    Ok(fetched_at) => Ok(Some(fetched_at)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored jobs.
    pub async fn count_jobs(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{Employer, WorkplaceAddress};

    fn make_job(id: &str, headline: &str) -> JobAd {
        JobAd {
            headline: Some(headline.to_string()),
            employer: Some(Employer { name: Some("Acme AB".into()), ..Default::default() }),
            workplace_address: Some(WorkplaceAddress {
                city: Some("Göteborg".into()),
                country: Some("Sverige".into()),
                ..Default::default()
            }),
            ..JobAd::new(id)
        }
    }

    #[tokio::test]
    async fn test_save_and_get_job() {
        let db = JobStore::open_in_memory().await.unwrap();
        let job = make_job("a1", "Backend developer");

        db.save_jobs(std::slice::from_ref(&job), 1_000).await.unwrap();

        let stored = db.get_job("a1").await.unwrap().unwrap();
        assert_eq!(stored, job);
        assert!(db.get_job("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_denormalized_columns() {
        let db = JobStore::open_in_memory().await.unwrap();
        db.save_jobs(&[make_job("a1", "Backend developer")], 1_000).await.unwrap();

        let (employer, location, fetched_at): (String, String, i64) = db
            .conn
            .call(|conn| {
                conn.query_row("SELECT employer_name, location, fetched_at FROM jobs WHERE id = 'a1'", [], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })
            })
            .await
            .unwrap();

        assert_eq!(employer, "Acme AB");
        assert_eq!(location, "Göteborg, Sverige");
        assert_eq!(fetched_at, 1_000);
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let db = JobStore::open_in_memory().await.unwrap();
        db.save_jobs(&[make_job("a1", "Old headline")], 1_000).await.unwrap();
        db.save_jobs(&[make_job("a1", "New headline")], 2_000).await.unwrap();

        let stored = db.get_job("a1").await.unwrap().unwrap();
        assert_eq!(stored.headline.as_deref(), Some("New headline"));
        assert_eq!(db.count_jobs().await.unwrap(), 1);
        assert_eq!(db.job_fetched_at("a1").await.unwrap(), Some(2_000));
        assert_eq!(db.job_fetched_at("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_jobs_by_ids_preserves_order_and_skips_missing() {
        let db = JobStore::open_in_memory().await.unwrap();
        db.save_jobs(&[make_job("a", "A"), make_job("b", "B"), make_job("c", "C")], 1_000)
            .await
            .unwrap();

        let ids: Vec<String> = ["c", "missing", "a"].iter().map(|s| s.to_string()).collect();
        let jobs = db.get_jobs_by_ids(&ids).await.unwrap();

        let got: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(got, vec!["c", "a"]);
        assert!(db.get_jobs_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_jobs_is_atomic() {
        let db = JobStore::open_in_memory().await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_poison BEFORE INSERT ON jobs
                     WHEN NEW.id = 'poison'
                     BEGIN SELECT RAISE(ABORT, 'poisoned'); END;",
                )
            })
            .await
            .unwrap();

        let result = db.save_jobs(&[make_job("ok", "fine"), make_job("poison", "bad")], 1_000).await;

        assert!(result.is_err());
        assert_eq!(db.count_jobs().await.unwrap(), 0);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}

//! Swipe decisions.
//!
//! At most one decision is stored per job; swiping again overwrites the
//! direction and timestamp.

use std::collections::HashMap;

use super::connection::JobStore;
use super::jobs::{placeholders, upsert_jobs};
use crate::{Error, JobAd, SwipeDirection};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, params_from_iter};

/// A stored swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeRecord {
    pub direction: SwipeDirection,
    pub swiped_at: i64,
}

/// A right-swiped job with the time it was liked.
#[derive(Debug, Clone, PartialEq)]
pub struct LikedJob {
    pub job: JobAd,
    pub liked_at: i64,
}

fn parse_direction(raw: &str) -> Result<SwipeDirection, Error> {
    raw.parse()
        .map_err(|_| Error::Serialization(format!("unexpected swipe direction '{raw}' in store")))
}

fn upsert_swipe(
    conn: &rusqlite::Connection, job_id: &str, direction: SwipeDirection, swiped_at: i64,
) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO swipes (job_id, direction, swiped_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(job_id) DO UPDATE SET
            direction = excluded.direction,
            swiped_at = excluded.swiped_at",
        params![job_id, direction.as_str(), swiped_at],
    )?;
    Ok(())
}

impl JobStore {
    /// Record a swipe, replacing any previous decision for the job.
    pub async fn save_swipe(&self, job_id: &str, direction: SwipeDirection, swiped_at: i64) -> Result<(), Error> {
        let job_id = job_id.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> { upsert_swipe(conn, &job_id, direction, swiped_at) })
            .await
            .map_err(Error::from)
    }

    /// Record a swipe together with a freshly fetched job.
    ///
    /// When `job` is given it is upserted in the same transaction as the
    /// swipe, so a failed swipe write leaves no job row behind.
    pub async fn record_swipe(
        &self, job: Option<&JobAd>, job_id: &str, direction: SwipeDirection, swiped_at: i64,
    ) -> Result<(), Error> {
        let job = job.cloned();
        let job_id = job_id.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                if let Some(job) = &job {
                    upsert_jobs(&tx, std::slice::from_ref(job), swiped_at)?;
                }
                upsert_swipe(&tx, &job_id, direction, swiped_at)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the stored decision for one job.
    pub async fn get_swipe(&self, job_id: &str) -> Result<Option<SwipeRecord>, Error> {
        let job_id = job_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<SwipeRecord>, Error> {
                let result = conn.query_row(
                    "SELECT direction, swiped_at FROM swipes WHERE job_id = ?1",
                    params![job_id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                );

                match result {
                    Ok((direction, swiped_at)) => {
                        Ok(Some(SwipeRecord { direction: parse_direction(&direction)?, swiped_at }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get the stored directions for a set of jobs.
    ///
    /// Jobs that were never swiped are absent from the map.
    pub async fn get_swipe_map(&self, job_ids: &[String]) -> Result<HashMap<String, SwipeDirection>, Error> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let job_ids = job_ids.to_vec();
        self.conn
            .call(move |conn| -> Result<HashMap<String, SwipeDirection>, Error> {
                let sql = format!(
                    "SELECT job_id, direction FROM swipes WHERE job_id IN ({})",
                    placeholders(job_ids.len())
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(job_ids.iter()), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut map = HashMap::new();
                for row in rows {
                    let (job_id, direction) = row?;
                    map.insert(job_id, parse_direction(&direction)?);
                }
                Ok(map)
            })
            .await
            .map_err(Error::from)
    }

    /// All right-swiped jobs, most recently liked first.
    ///
    /// Swipes whose job row is missing are skipped.
    pub async fn liked_jobs(&self) -> Result<Vec<LikedJob>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<LikedJob>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT jobs.data_json, swipes.swiped_at
                    FROM swipes
                    JOIN jobs ON jobs.id = swipes.job_id
                    WHERE swipes.direction = 'right'
                    ORDER BY swipes.swiped_at DESC, swipes.rowid DESC",
                )?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

                let mut liked = Vec::new();
                for row in rows {
                    let (json, liked_at) = row?;
                    liked.push(LikedJob { job: serde_json::from_str(&json)?, liked_at });
                }
                Ok(liked)
            })
            .await
            .map_err(Error::from)
    }
}

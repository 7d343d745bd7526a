//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! (WAL mode, busy timeout), running migrations, and closing the connection
//! at shutdown.

use super::migrations;
use crate::Error;
use std::path::Path;
use std::time::Duration;
use tokio_rusqlite::Connection;

/// Busy timeout used when none is configured.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Job store handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning is cheap and shares the connection.
#[derive(Clone, Debug)]
pub struct JobStore {
    pub(crate) conn: Connection,
}

impl JobStore {
    /// Open a database at the specified path.
    ///
    /// Creates the parent directory and the file if they don't exist, applies
    /// pragmas, and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::MigrationFailed(format!("cannot create {}: {e}", parent.display())))?;
        }

        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        let store = Self::init(conn, busy_timeout).await?;

        tracing::info!(path = %path.display(), "job store opened");
        Ok(store)
    }

    /// Open an in-memory database for testing.
    ///
    /// Creates a temporary in-memory SQLite database with the same
    /// pragma configuration as file-based databases.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;

        Self::init(conn, DEFAULT_BUSY_TIMEOUT).await
    }

    async fn init(conn: Connection, busy_timeout: Duration) -> Result<Self, Error> {
        conn.call(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Close the underlying connection, flushing pending work.
    ///
    /// Other clones of this store fail with a closed-connection error afterwards.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::from)?;
        tracing::info!("job store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = JobStore::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_busy_timeout_applied() {
        let db = JobStore::open_in_memory().await.unwrap();
        let timeout: i64 = db
            .conn
            .call(|conn| conn.query_row("PRAGMA busy_timeout", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(timeout, 5_000);
    }

    #[tokio::test]
    async fn test_open_file_creates_parent_and_persists() {
        let dir = std::env::temp_dir().join(format!("jobswipe-open-{}", std::process::id()));
        let path = dir.join("nested").join("jobs.sqlite");

        let db = JobStore::open(&path, Duration::from_millis(250)).await.unwrap();
        db.save_jobs(&[crate::JobAd::new("persisted")], 1).await.unwrap();
        db.close().await.unwrap();

        let reopened = JobStore::open(&path, Duration::from_millis(250)).await.unwrap();
        assert!(reopened.get_job("persisted").await.unwrap().is_some());
        reopened.close().await.unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}

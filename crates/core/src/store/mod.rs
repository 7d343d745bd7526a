//! SQLite-backed store for job ads, swipe decisions and cached searches.
//!
//! This module provides persistent storage using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Canonical query hashing with SHA-256 for search cache keys
//! - Automatic schema migrations
//! - WAL mode with a bounded busy timeout
//! - Transactional batch upserts of fetched jobs

pub mod connection;
pub mod hash;
pub mod jobs;
pub mod migrations;
pub mod search;
pub mod swipes;

pub use crate::Error;

pub use connection::JobStore;
pub use hash::{CanonicalQuery, canonicalize};
pub use search::SearchCacheEntry;
pub use swipes::{LikedJob, SwipeRecord};

/// Current time as epoch milliseconds, the unit every stored timestamp uses.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

//! Core types and shared functionality for jobswipe.
//!
//! This crate provides:
//! - SQLite store for jobs, swipes and the search cache
//! - Query canonicalization for cache keys
//! - Job ad model and card projection
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod job;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use job::{JobAd, JobCard, SwipeDirection};
pub use store::{JobStore, SearchCacheEntry};

//! Client code for jobswipe.
//!
//! This crate provides the JobTech JobSearch API client and the `JobSource`
//! seam the search service is written against.

pub mod jobtech;

pub use jobtech::{
    JobSource, JobtechClient, JobtechConfig, JobtechError, SearchFilters, SearchParams, SearchResponse,
};

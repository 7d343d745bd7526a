//! Swipe recording.
//!
//! A swipe on a job that has never been fetched pulls the ad from upstream
//! first so the liked list can always render it.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use jobswipe_core::store::now_ms;
use jobswipe_core::{Error, JobCard, SwipeDirection};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handler::AppState;

/// Request body of `POST /api/jobs/{id}/swipe`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwipeBody {
    #[serde(default)]
    pub direction: Option<String>,
}

impl SwipeBody {
    /// Lenient parse: an unreadable body counts as a missing direction.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

/// Response body of a successful swipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeOutput {
    pub job: JobCard,
    pub direction: SwipeDirection,
}

/// Record a swipe for `job_id`.
///
/// The direction is validated before anything else is touched.
pub async fn swipe_impl(state: &AppState, job_id: &str, direction: Option<&str>) -> Result<SwipeOutput, Error> {
    let direction: SwipeDirection = direction
        .ok_or_else(|| Error::InvalidInput("direction must be 'left' or 'right'".into()))?
        .parse()?;

    let (job, fetched) = match state.store.get_job(job_id).await? {
        Some(job) => (job, false),
        None => {
            tracing::debug!(job_id, "job not stored locally, fetching from upstream");
            (state.source.fetch_ad(job_id).await?, true)
        }
    };

    // Keyed by the stored ad's id so the liked join always finds the row.
    state
        .store
        .record_swipe(fetched.then_some(&job), &job.id, direction, now_ms())
        .await?;
    tracing::info!(job_id = %job.id, %direction, "swipe recorded");

    Ok(SwipeOutput { job: job.to_card(Some(direction)), direction })
}

/// `POST /api/jobs/{id}/swipe`
pub async fn swipe(
    State(state): State<AppState>, Path(job_id): Path<String>, body: Bytes,
) -> Result<Json<SwipeOutput>, ApiError> {
    let body = SwipeBody::from_bytes(&body);
    Ok(Json(swipe_impl(&state, &job_id, body.direction.as_deref()).await?))
}
